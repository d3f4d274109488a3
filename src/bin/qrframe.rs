use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use qrframe::{
    BrandSettings, DirectoryTarget, ExportFormat, ExportOutcome, ExportSession, StyledEngine,
};

#[derive(Parser, Debug)]
#[command(name = "qrframe", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a framed QR code and write it to disk.
    Export(ExportArgs),
    /// List the frames in the catalog.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Text to encode. Lines are trimmed and joined with CRLF.
    #[arg(long)]
    data: String,

    /// Brand settings JSON. Defaults to the built-in brand.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame id. Defaults to the brand's default frame.
    #[arg(long)]
    frame: Option<String>,

    /// Output format: png, jpeg or svg.
    #[arg(long, default_value = "png")]
    format: ExportFormat,

    /// Directory the file is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip the brand logo even when one is configured.
    #[arg(long)]
    no_logo: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Brand settings JSON. Defaults to the built-in brand.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args).await,
        Command::Frames(args) => cmd_frames(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Settings plus the directory relative paths inside them resolve against.
fn load_settings(config: Option<&Path>) -> anyhow::Result<(BrandSettings, PathBuf)> {
    match config {
        Some(path) => {
            let settings = BrandSettings::from_path(path)
                .with_context(|| format!("load brand settings '{}'", path.display()))?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((settings, root))
        }
        None => Ok((BrandSettings::builtin(), PathBuf::from("."))),
    }
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let (settings, root) = load_settings(args.config.as_deref())?;
    let frame = args
        .frame
        .clone()
        .unwrap_or_else(|| settings.default_frame.clone());
    let logo = settings.resolve_logo(&root, !args.no_logo);

    let target = DirectoryTarget::new(&args.out_dir);
    let session = ExportSession::new(StyledEngine::new(), settings, target.clone())?;
    session.set_style(session.style_for(&args.data, logo));

    let report = session.export(&frame, args.format).await;
    match report.outcome {
        ExportOutcome::Done(file) => {
            println!("{}", target.path_for(&file).display());
            Ok(())
        }
        ExportOutcome::Failed { kind, notice } => anyhow::bail!("{notice} ({kind:?})"),
        ExportOutcome::Superseded => anyhow::bail!("export was superseded"),
    }
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (settings, _) = load_settings(args.config.as_deref())?;
    for frame in settings.frames.iter() {
        let marker = if frame.id == settings.default_frame {
            "*"
        } else {
            " "
        };
        let p = frame.position;
        println!(
            "{marker} {}\t{}x{}\tcode at ({}, {}) size {}",
            frame.id, frame.width, frame.height, p.x, p.y, p.size
        );
    }
    Ok(())
}
