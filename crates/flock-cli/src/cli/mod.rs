//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use flock_core::api::ApiClient;
use flock_core::config::{self, BASE_URL_ENV};
use flock_core::feed::FollowState;
use flock_core::logging;
use flock_core::session::{FileSessionStore, SessionStore};

mod commands;
pub mod interrupt;

use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "flock")]
#[command(version)]
#[command(about = "Minimal social feed client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Feed service base URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL", env = BASE_URL_ENV)]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(flatten)]
    Service(ServiceCommands),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Commands that talk to the feed service or the session store.
#[derive(clap::Subcommand)]
enum ServiceCommands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,

    /// Print the feed, newest first
    Feed {
        /// Only posts by authors you follow
        #[arg(long)]
        following: bool,
    },
    /// Publish a post
    Post {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Follow an author
    Follow {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
    /// Unfollow an author
    Unfollow {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init()?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move {
        tokio::select! {
            result = dispatch(cli) => result,
            () = interrupt::wait_for_interrupt() => Err(interrupt::InterruptedError.into()),
        }
    })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, base_url } = cli;

    match command {
        Some(Commands::Config { command }) => commands::config::run(command),
        Some(Commands::Service(command)) => run_service(Some(command), base_url).await,
        None => run_service(None, base_url).await,
    }
}

async fn run_service(command: Option<ServiceCommands>, base_url: Option<String>) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let _log_guard = logging::init(&config).context("init logging")?;

    let base_url = config::resolve_base_url(base_url.as_deref(), config.base_url.as_deref())?;
    let client = ApiClient::new(&base_url)?;
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::default_location());

    // default to the interactive client
    let Some(command) = command else {
        return crate::modes::run_interactive(&config, store, client)
            .await
            .context("interactive client failed");
    };

    let store = store.as_ref();
    match command {
        ServiceCommands::Login { email, password } => {
            commands::auth::login(&client, store, &email, &password).await
        }
        ServiceCommands::Signup {
            email,
            password,
            name,
        } => commands::auth::signup(&client, store, &email, &password, &name).await,
        ServiceCommands::Logout => commands::auth::logout(store),
        ServiceCommands::Whoami => commands::auth::whoami(store),

        ServiceCommands::Feed { following } => commands::feed::show(&client, store, following).await,
        ServiceCommands::Post { text } => commands::feed::post(&client, store, &text).await,
        ServiceCommands::Follow { user_id } => {
            commands::feed::follow(&client, store, &user_id, FollowState::Following).await
        }
        ServiceCommands::Unfollow { user_id } => {
            commands::feed::follow(&client, store, &user_id, FollowState::NotFollowing).await
        }
    }
}
