//! mdio - inspect and resave Markdown files without disturbing their bytes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mdio_config::Config;
use mdio_fs::{LineEnding, MarkdownDocument, MarkdownLoader, MarkdownSaver};

#[derive(Parser)]
#[command(name = "mdio")]
#[command(about = "Load and save Markdown files with byte-level fidelity")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to the usual search paths)
    #[arg(short, long, env = "MDIO_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Line-ending style assumed for files with mixed or no endings
    #[arg(long, value_enum, global = true)]
    eol: Option<EolArg>,

    /// Use the default encoding for files without a BOM
    #[arg(long, global = true)]
    no_guess: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print what was detected about a file
    Inspect { path: PathBuf },
    /// Load a file and save it back, refreshing front-matter timestamps
    Resave { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum EolArg {
    Lf,
    Crlf,
}

impl From<EolArg> for LineEnding {
    fn from(arg: EolArg) -> Self {
        match arg {
            EolArg::Lf => LineEnding::Lf,
            EolArg::Crlf => LineEnding::Crlf,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::load()?,
    };
    config.validate()?;
    Ok(config)
}

fn print_document(doc: &MarkdownDocument) {
    println!("path:               {}", doc.pathname().display());
    println!("filename:           {}", doc.filename());
    println!("encoding:           {}", doc.encoding().encoding);
    println!("bom:                {}", doc.encoding().has_bom);
    println!("line ending:        {}", doc.line_ending());
    println!("mixed line endings: {}", doc.is_mixed_line_endings());
    println!("adjust on save:     {}", doc.adjust_line_ending_on_save());
    println!("trailing newline:   {:?}", doc.trailing_newline());
    println!("lines:              {}", doc.markdown.lines().count());
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!(?config, "configuration loaded");

    let mut loader_config = config.loader_config();
    if let Some(eol) = cli.eol {
        loader_config.options.preferred_eol = eol.into();
    }
    if cli.no_guess {
        loader_config.options.auto_guess_encoding = false;
    }
    let loader = MarkdownLoader::new(loader_config);

    match &cli.command {
        Commands::Inspect { path } => {
            let doc = loader
                .load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            print_document(&doc);
        }
        Commands::Resave { path } => {
            let doc = loader
                .load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let saved = MarkdownSaver::new(config.saver_config())
                .save_document(&doc)
                .with_context(|| format!("Failed to save {}", doc.pathname().display()))?;
            info!(path = %saved.path.display(), bytes = saved.bytes_written, "resaved");
        }
    }

    Ok(())
}
