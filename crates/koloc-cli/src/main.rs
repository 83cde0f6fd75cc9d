use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use koloc_config::KolocConfig;
use koloc_services::Layout;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod ui;

/// Version stamped into machine-readable output.
pub const OUTPUT_SCHEMA_VERSION: u32 = koloc_domain::SCHEMA_VERSION;

#[derive(Parser)]
#[command(name = "koloc", version, about = "KOAssistant localization toolkit")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Root of the `<lang>/LC_MESSAGES/<domain>.po` tree
    #[arg(long, global = true)]
    locale_dir: Option<PathBuf>,

    /// Catalog file stem
    #[arg(long, global = true)]
    domain: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ValidatorKind {
    InProcess,
    Subprocess,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show translation progress and suggested next steps
    Status {
        lang: String,
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Export strings that need work to JSON batches
    Extract {
        lang: String,
        /// All non-verified strings
        #[arg(long, conflicts_with = "fuzzy")]
        all: bool,
        /// Fuzzy strings only
        #[arg(long)]
        fuzzy: bool,
        /// Export a single batch (1-based)
        #[arg(long)]
        batch: Option<usize>,
        #[arg(long)]
        batch_size: Option<usize>,
        /// Output file (with --batch) or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Merge translated JSON files back into the catalog
    Apply {
        lang: String,
        files: Vec<PathBuf>,
        /// Translations were reviewed by a human: clear the fuzzy flag
        #[arg(long, default_value_t = false)]
        verified: bool,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value_t = false)]
        no_validate: bool,
        #[arg(long, value_enum)]
        validator: Option<ValidatorKind>,
    },

    /// Check catalogs against the translation policies
    Validate {
        /// Languages to check (default: configured list or every known language)
        #[arg(long, num_args = 1..)]
        lang: Vec<String>,
        /// Also print informational findings
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
        #[arg(long, default_value_t = false)]
        errors_only: bool,
        /// One line per language
        #[arg(long, default_value_t = false)]
        summary: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write JSON schemas of the exchanged documents
    Schema {
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Everything a command needs besides its own arguments.
pub struct Ctx {
    pub cfg: KolocConfig,
    pub layout: Layout,
    pub use_color: bool,
}

trait Runnable {
    fn run(self, ctx: &Ctx) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, ctx: &Ctx) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!(event = "command_start", cmd = %cmd_name);

        let result = match self {
            Commands::Status { lang, batch_size } => {
                commands::status::run_status(ctx, &lang, batch_size)
            }
            Commands::Extract {
                lang,
                all,
                fuzzy,
                batch,
                batch_size,
                output,
                dry_run,
            } => {
                debug!(event = "extract_args", lang = %lang, all, fuzzy, batch = ?batch, output = ?output, dry_run);
                commands::extract::run_extract(
                    ctx,
                    &lang,
                    commands::extract::mode_from_flags(all, fuzzy),
                    batch,
                    batch_size,
                    output,
                    dry_run,
                )
            }
            Commands::Apply {
                lang,
                files,
                verified,
                dry_run,
                no_validate,
                validator,
            } => {
                debug!(event = "apply_args", lang = %lang, files = files.len(), verified, dry_run, no_validate);
                commands::apply::run_apply(
                    ctx,
                    &lang,
                    &files,
                    verified,
                    dry_run,
                    no_validate,
                    validator,
                )
            }
            Commands::Validate {
                lang,
                verbose,
                errors_only,
                summary,
                format,
            } => commands::validate::run_validate(
                ctx,
                lang,
                commands::validate::Verbosity {
                    verbose,
                    errors_only,
                    summary,
                },
                format,
            ),
            Commands::Schema { out_dir } => commands::schema::run_schema(ctx, out_dir),
        };

        match &result {
            Ok(_) => info!(event = "command_done", cmd = %cmd_name),
            Err(e) => error!(event = "command_failed", cmd = %cmd_name, error = %e),
        }

        result
    }
}

/// Console layer on stderr; an extra daily file layer when `KOLOC_LOG_DIR` is set.
/// The returned guard must live until exit so buffered file logs get flushed.
fn init_tracing(quiet: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let (file_layer, guard) = match std::env::var_os("KOLOC_LOG_DIR") {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "koloc.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _guard = init_tracing(cli.quiet);

    let cfg = koloc_config::load_config()?;
    let locale_dir = cli
        .locale_dir
        .or_else(|| cfg.locale_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(koloc_services::DEFAULT_LOCALE_DIR));
    let domain = cli
        .domain
        .or_else(|| cfg.domain.clone())
        .unwrap_or_else(|| koloc_services::DEFAULT_DOMAIN.to_string());

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let ctx = Ctx {
        layout: Layout::new(locale_dir, domain),
        cfg,
        use_color,
    };
    cli.cmd.run(&ctx)
}
