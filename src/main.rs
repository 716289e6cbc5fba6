use argh::FromArgs;
use log::info;
use pokemon_pic::{gen1, rom, DecodeError, LayoutError, Mode, RomError, Sprite};
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Bytes read from a ROM when no `--length` is given; more than any sprite needs.
const DEFAULT_ROM_LENGTH: usize = 0x1000;

const GRAYSCALE: [u8; 4] = [255, 170, 85, 0];

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Rom(#[from] RomError),
    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    TwoBpp,
    Pgm,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "2bpp" => Ok(OutputFormat::TwoBpp),
            "pgm" => Ok(OutputFormat::Pgm),
            _ => Err(format!("Invalid output format: {s}. Valid formats are: 2bpp, pgm")),
        }
    }
}

fn parse_number(value: &str) -> Result<u64, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };

    parsed.map_err(|e| format!("invalid number {value}: {e}"))
}

#[derive(FromArgs, Debug)]
/// Compress and decompress Pokemon Gen I sprites
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Decompress(DecompressCmd),
    Compress(CompressCmd),
    Info(InfoCmd),
}

#[derive(FromArgs, Debug)]
/// Decompress a sprite to 2bpp tiles or a PGM image
#[argh(subcommand, name = "decompress")]
struct DecompressCmd {
    /// compressed sprite, or a ROM image with --offset
    #[argh(positional)]
    input: PathBuf,

    /// output file
    #[argh(positional)]
    output: PathBuf,

    /// offset of the sprite inside the input file
    #[argh(option, from_str_fn(parse_number))]
    offset: Option<u64>,

    /// number of bytes to read from the offset [default: 0x1000]
    #[argh(option, from_str_fn(parse_number))]
    length: Option<u64>,

    /// output format (2bpp, pgm) [default: 2bpp]
    #[argh(option)]
    format: Option<OutputFormat>,
}

#[derive(FromArgs, Debug)]
/// Compress row-major 2bpp tiles into a sprite
#[argh(subcommand, name = "compress")]
struct CompressCmd {
    /// input file of 2bpp tiles
    #[argh(positional)]
    input: PathBuf,

    /// output file
    #[argh(positional)]
    output: PathBuf,

    /// plane order bit (0, 1), requires --mode
    #[argh(option)]
    order: Option<u8>,

    /// plane mode (0, 1, 2), requires --order
    #[argh(option)]
    mode: Option<u8>,
}

#[derive(FromArgs, Debug)]
/// Print the header of a compressed sprite
#[argh(subcommand, name = "info")]
struct InfoCmd {
    /// compressed sprite, or a ROM image with --offset
    #[argh(positional)]
    input: PathBuf,

    /// offset of the sprite inside the input file
    #[argh(option, from_str_fn(parse_number))]
    offset: Option<u64>,
}

fn read_input(path: &Path, offset: Option<u64>, length: Option<u64>) -> Result<Vec<u8>, CliError> {
    if offset.is_none() && length.is_none() {
        return Ok(fs::read(path)?);
    }

    let start = offset.unwrap_or(0);
    let length = rom_length(length)?;

    info!("reading {length} bytes at {start:#x} from {}", path.display());

    Ok(rom::read_file_range(path, start, length, &[])?)
}

fn rom_length(length: Option<u64>) -> Result<usize, CliError> {
    match length {
        None => Ok(DEFAULT_ROM_LENGTH),
        Some(length) => usize::try_from(length)
            .map_err(|_| CliError::Usage(format!("length {length:#x} does not fit in memory"))),
    }
}

fn pgm(sprite: &Sprite) -> Vec<u8> {
    let mut result = format!("P5\n{} {}\n255\n", sprite.width(), sprite.height()).into_bytes();

    result.extend(sprite.indices().iter().map(|&i| GRAYSCALE[i as usize]));

    result
}

fn handle_decompress_command(cmd: DecompressCmd) -> Result<(), CliError> {
    let input = read_input(&cmd.input, cmd.offset, cmd.length)?;
    let sprite = Sprite::decode(&input)?;

    info!(
        "decoded {}x{} sprite ({} bytes)",
        sprite.width(),
        sprite.height(),
        sprite.data().len()
    );

    let output = match cmd.format.unwrap_or(OutputFormat::TwoBpp) {
        OutputFormat::TwoBpp => sprite.into_data(),
        OutputFormat::Pgm => pgm(&sprite),
    };

    fs::write(&cmd.output, output)?;

    Ok(())
}

fn handle_compress_command(cmd: CompressCmd) -> Result<(), CliError> {
    let input = fs::read(&cmd.input)?;

    let output = match (cmd.order, cmd.mode) {
        (None, None) => gen1::compress(&input)?,
        (Some(order @ 0..=1), Some(mode)) => {
            let mode = Mode::try_from(mode)
                .map_err(|mode| CliError::Usage(format!("invalid mode {mode}, expected 0 to 2")))?;

            gen1::compress_with(&input, order == 1, mode)?
        }
        (Some(order), Some(_)) => {
            return Err(CliError::Usage(format!("invalid order {order}, expected 0 or 1")));
        }
        _ => {
            return Err(CliError::Usage("--order and --mode must be given together".into()));
        }
    };

    info!("compressed {} bytes to {}", input.len(), output.len());

    fs::write(&cmd.output, output)?;

    Ok(())
}

fn handle_info_command(cmd: InfoCmd) -> Result<(), CliError> {
    let input = read_input(&cmd.input, cmd.offset, None)?;
    let (header, data) = gen1::decompress_with_header(&input)?;

    println!("width: {} tiles", header.width);
    println!("order: {}", header.order_reversed as u8);
    println!("mode: {}", header.mode.index());
    println!("decompressed: {} bytes", data.len());

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Decompress(cmd) => handle_decompress_command(cmd)?,
        Commands::Compress(cmd) => handle_compress_command(cmd)?,
        Commands::Info(cmd) => handle_info_command(cmd)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compress_with_pair() {
        let cli = TopLevel::from_args(
            &["pokepic"],
            &["compress", "sprite.2bpp", "sprite.pic", "--order", "1", "--mode", "2"],
        )
        .unwrap();

        let cmd = match cli.command {
            Commands::Compress(cmd) => cmd,
            other => panic!("expected compress, got {other:?}"),
        };

        assert_eq!(cmd.input, PathBuf::from("sprite.2bpp"));
        assert_eq!(cmd.output, PathBuf::from("sprite.pic"));
        assert_eq!((cmd.order, cmd.mode), (Some(1), Some(2)));
    }

    #[test]
    fn parses_decompress_options() {
        let cli = TopLevel::from_args(
            &["pokepic"],
            &["decompress", "red.gb", "out.pgm", "--offset", "0x34000", "--format", "pgm"],
        )
        .unwrap();

        let cmd = match cli.command {
            Commands::Decompress(cmd) => cmd,
            other => panic!("expected decompress, got {other:?}"),
        };

        assert_eq!(cmd.offset, Some(0x34000));
        assert_eq!(cmd.length, None);
        assert_eq!(cmd.format, Some(OutputFormat::Pgm));
    }

    #[test]
    fn rom_lengths() {
        assert_eq!(rom_length(None).unwrap(), DEFAULT_ROM_LENGTH);
        assert_eq!(rom_length(Some(0x400)).unwrap(), 0x400);
        assert_eq!(rom_length(Some(u32::MAX as u64)).unwrap(), u32::MAX as usize);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn rom_length_too_large() {
        assert!(matches!(rom_length(Some(u64::MAX)), Err(CliError::Usage(_))));
    }
}
