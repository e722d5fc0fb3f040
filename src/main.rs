use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use themesify::app::{format_buckets, PublishTarget, ThemesifyApp};
use themesify::config::{AppConfig, CliConfig, FileConfig};
use themesify::constants::APP_NAME;
use themesify::utils::error_handling::create_runtime;
use themesify::utils::errors::{AppError, Notice};

// App version and metadata
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "themesify", version, about = "Sort your liked songs into mood playlists")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, env = "THEMESIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Spotify application client id
    #[arg(long, env = "THEMESIFY_CLIENT_ID")]
    client_id: Option<String>,

    /// Loopback redirect URI registered for the client id
    #[arg(long, env = "THEMESIFY_REDIRECT_URI")]
    redirect_uri: Option<String>,

    /// Web API base URL
    #[arg(long, env = "THEMESIFY_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Directory holding the token database
    #[arg(long, env = "THEMESIFY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Retries on rate limiting and server errors (0 disables)
    #[arg(long, env = "THEMESIFY_MAX_RETRIES")]
    max_retries: Option<u32>,

    /// Treat a missing audio feature as a failed rule instead of a passed one
    #[arg(long, env = "THEMESIFY_STRICT_FEATURES")]
    strict_features: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in through the browser
    Login {
        /// Paste the redirect URL fragment instead of running the local listener
        #[arg(long)]
        fragment: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show who is logged in
    Status,
    /// List the moods and their rules
    Moods,
    /// Classify your liked songs and show how many land in each mood
    Analyze {
        /// Also list every track under its mood
        #[arg(long)]
        tracks: bool,
    },
    /// Create playlists from mood buckets
    Publish {
        /// Mood keys or names, e.g. `happy chill`
        moods: Vec<String>,

        /// Publish every non-empty mood
        #[arg(long, conflicts_with = "moods")]
        all: bool,
    },
}

impl Cli {
    fn cli_config(&self) -> CliConfig {
        CliConfig {
            client_id: self.client_id.clone(),
            redirect_uri: self.redirect_uri.clone(),
            api_base_url: self.api_base_url.clone(),
            data_dir: self.data_dir.clone(),
            max_retries: self.max_retries,
            strict_features: self.strict_features,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        let file = match self.config.clone().or_else(FileConfig::default_path) {
            Some(path) => FileConfig::load(&path)?,
            None => None,
        };
        Ok(AppConfig::resolve(&self.cli_config(), file))
    }
}

fn main() -> ExitCode {
    // Set RUST_LOG=debug for verbose output, RUST_LOG=warn to silence progress logs
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("rustls", log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();
    log::info!("[Main] Starting {} v{}", APP_NAME, APP_VERSION);

    let notice = match run(cli) {
        Ok(notice) => notice,
        Err(e) => Notice::from(&e),
    };

    if notice.is_error() {
        eprintln!("{}", notice.message);
        ExitCode::FAILURE
    } else {
        println!("{}", notice.message);
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<Notice, AppError> {
    let config = cli.load_config()?;
    let app = ThemesifyApp::new(config)?;

    let runtime = create_runtime().map_err(AppError::Config)?;
    runtime.block_on(async {
        match cli.command {
            Command::Login { fragment: Some(fragment) } => app.login_with_fragment(&fragment),
            Command::Login { fragment: None } => app.login().await,
            Command::Status => app.status().await,
            Command::Analyze { tracks } => app
                .analyze()
                .await
                .map(|buckets| Notice::success(format_buckets(&buckets, tracks))),
            Command::Publish { moods, all } => {
                let target = if all {
                    PublishTarget::All
                } else {
                    PublishTarget::Moods(moods)
                };
                app.publish(&target).await
            }
            Command::Moods => Ok(app.moods()),
            Command::Logout => app.logout(),
        }
    })
}
