//! FLACer - FLAC to MP3/M4A batch converter
//!
//! Converts FLAC files to high-bitrate MP3 or M4A (AAC), copying the
//! recognized metadata tags and the first embedded cover image. A single
//! input yields a bare converted file; several inputs yield a ZIP archive.

mod audio;
mod batch;
mod conversion;
mod error;
mod logging;
#[cfg(test)]
mod test_fixtures;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use walkdir::WalkDir;

use audio::is_flac_file;
use batch::{convert_batch, ConversionLog};
use conversion::BitrateMode;
use error::Result;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Mp3,
    M4a,
}

impl FormatArg {
    fn as_str(self) -> &'static str {
        match self {
            FormatArg::Mp3 => "mp3",
            FormatArg::M4a => "m4a",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Cbr,
    Vbr,
    Abr,
}

impl From<ModeArg> for BitrateMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Cbr => BitrateMode::Cbr,
            ModeArg::Vbr => BitrateMode::Vbr,
            ModeArg::Abr => BitrateMode::Abr,
        }
    }
}

/// Convert FLAC files to high-bitrate MP3 or M4A
#[derive(Parser, Debug)]
#[command(name = "flacer", version)]
struct Cli {
    /// FLAC files or directories to convert
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Target format
    #[arg(long, value_enum, default_value_t = FormatArg::Mp3)]
    format: FormatArg,

    /// Bitrate mode
    #[arg(long, value_enum, default_value_t = ModeArg::Cbr)]
    mode: ModeArg,

    /// Bitrate in kbps for CBR/ABR; ignored for VBR
    #[arg(long, default_value_t = 320)]
    bitrate: u32,

    /// Directory the converted file or archive is written to
    #[arg(long, short, default_value = ".")]
    output: PathBuf,
}

fn load_file(path: &Path) -> Result<(String, Vec<u8>)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown.flac".to_string());
    let data = fs::read(path)?;
    Ok((name, data))
}

/// Expand the input arguments to an ordered list of in-memory files
///
/// Directories are scanned recursively for `.flac` files in sorted order;
/// plain file arguments are taken as-is in argument order.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && is_flac_file(entry.path()) {
                    files.push(load_file(entry.path())?);
                }
            }
        } else {
            files.push(load_file(path)?);
        }
    }
    Ok(files)
}

fn run(cli: &Cli) -> Result<()> {
    conversion::verify_ffmpeg()?;

    let files = collect_inputs(&cli.inputs)?;
    let mut log = ConversionLog::new();
    let output = convert_batch(
        &files,
        cli.format.as_str(),
        cli.mode.into(),
        cli.bitrate,
        &mut log,
    )?;

    fs::create_dir_all(&cli.output)?;
    let out_path = cli.output.join(output.file_name());
    fs::write(&out_path, output.data())?;
    log::info!(
        "Wrote {} ({} bytes, {})",
        out_path.display(),
        output.data().len(),
        output.mime()
    );

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging();

    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["flacer", "album.flac"]).unwrap();
        assert_eq!(cli.inputs, vec![PathBuf::from("album.flac")]);
        assert_eq!(cli.bitrate, 320);
        assert!(matches!(cli.format, FormatArg::Mp3));
        assert!(matches!(cli.mode, ModeArg::Cbr));
    }

    #[test]
    fn test_cli_requires_inputs() {
        assert!(Cli::try_parse_from(["flacer"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["flacer", "a.flac", "--format", "ogg"]).is_err());
    }

    #[test]
    fn test_collect_inputs_scans_directories_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.flac"), b"bb").unwrap();
        fs::write(dir.path().join("a.flac"), b"aa").unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let files = collect_inputs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = files.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.flac", "b.flac"]);
        assert_eq!(files[0].1, b"aa");
    }
}
