use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "brandlog")]
#[command(about = "brandlog - inspect and persist BrandAgent session logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List session logs kept in the local store
    Logs {
        /// Only show sessions whose name, industry or id contains this
        #[arg(long)]
        search: Option<String>,
    },
    /// List failed persistence attempts
    Failed {
        /// Restrict to one holding area
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Print analytics over the locally stored logs
    Summary,
    /// Fan a session log JSON file out to every configured sink
    Persist {
        /// Path to a session log record (JSON)
        file: std::path::PathBuf,
    },
    /// Show the resolved configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Notification,
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Logs { search } => commands::logs::list(search.as_deref())?,
        Commands::Failed { category } => commands::failed::list(category.map(Into::into))?,
        Commands::Summary => commands::logs::summary()?,
        Commands::Persist { file } => commands::persist::run(&file).await?,
        Commands::Config => commands::config::show()?,
    }

    Ok(())
}

impl From<CategoryArg> for brandlog_core::failure::FailureCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Notification => Self::FailedNotification,
            CategoryArg::Session => Self::FailedSessionPersist,
        }
    }
}
