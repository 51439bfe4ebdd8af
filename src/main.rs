use carousel_splitter::archive::{self, Upload};
use carousel_splitter::imaging::StripWidth;
use carousel_splitter::{config, naming, output, server};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "carousel-splitter")]
#[command(about = "Split wide images into carousel strips")]
#[command(long_about = "\
Split wide images into carousel strips

Each image is cut left to right into vertical strips of a fixed width
(1080px unless configured otherwise). Strips keep the full image height and
the source format, and are packed into a ZIP archive:

  foo.png (2200×1350)  →  foo-splited.zip
                          ├── foo_parte01.png   1080px
                          ├── foo_parte02.png   1080px
                          └── foo_parte03.png     40px

Batch mode puts each image's strips in a folder named after it.

Run 'carousel-splitter serve' for the web upload form, or split files
directly with 'split' and 'split-batch'.

Run 'carousel-splitter gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that split images.
#[derive(clap::Args, Clone)]
struct SplitArgs {
    /// Strip width in pixels
    #[arg(long, default_value_t = StripWidth::DEFAULT)]
    strip_width: u32,

    /// Where to write the archive (defaults to the download name in the current directory)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the upload form and the split endpoints over HTTP
    Serve {
        /// Config file (stock defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Split one image into a ZIP of strips
    Split {
        file: PathBuf,
        #[command(flatten)]
        args: SplitArgs,
    },
    /// Split several images into one ZIP, one folder per image
    SplitBatch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        args: SplitArgs,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { config, host, port } => {
            let mut server_config = match config {
                Some(path) => config::load_config(&path)?,
                None => config::resolve_config(None)?,
            };
            if let Some(host) = host {
                server_config.server.host = host;
            }
            if let Some(port) = port {
                server_config.server.port = port;
            }
            server_config.validate()?;

            tokio::runtime::Runtime::new()?.block_on(server::serve(server_config))?;
        }
        Command::Split { file, args } => {
            let strip_width = parse_strip_width(args.strip_width)?;
            let upload = read_upload(&file)?;
            let result = archive::split_single(&upload, strip_width)?;
            let out = args
                .output
                .unwrap_or_else(|| PathBuf::from(&result.download_name));
            std::fs::write(&out, &result.bytes)?;
            output::print_single_output(
                upload.display_name(),
                &result,
                &out.display().to_string(),
            );
        }
        Command::SplitBatch { files, args } => {
            let strip_width = parse_strip_width(args.strip_width)?;
            let uploads = files
                .iter()
                .map(|path| read_upload(path))
                .collect::<Result<Vec<_>, _>>()?;
            let result = archive::assemble_batch(&uploads, strip_width)?;
            let out = args.output.unwrap_or_else(|| {
                PathBuf::from(naming::batch_archive_name(
                    result.images_processed,
                    result.total_strips,
                ))
            });
            std::fs::write(&out, &result.bytes)?;
            output::print_batch_output(&result, &out.display().to_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn parse_strip_width(value: u32) -> Result<StripWidth, String> {
    StripWidth::new(value).ok_or_else(|| "--strip-width must be greater than zero".to_string())
}

/// Read a file from disk as if it had been uploaded under its file name.
fn read_upload(path: &Path) -> std::io::Result<Upload> {
    let bytes = std::fs::read(path)?;
    Ok(Upload {
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        bytes,
    })
}
