//! Seu Garçom CLI - session and API tooling for operators.
//!
//! # Usage
//!
//! ```bash
//! # Generate a value for GARCOM_SESSION_SECRET
//! garcom secret generate
//!
//! # Seal a session cookie value (uses GARCOM_SESSION_SECRET)
//! garcom session seal --user-id u-1 --role ADMIN --token eyJ... --restaurant-id r-1
//!
//! # Decrypt a session cookie value
//! garcom session open <value>
//!
//! # Authenticated GET against GARCOM_API_BASE_URL
//! garcom api get restaurants/r-1/units --token eyJ...
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "garcom")]
#[command(author, version, about = "Seu Garçom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
    /// Seal or open session cookies
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Call the backend through the authenticated fetch client
    Api {
        #[command(subcommand)]
        action: ApiAction,
    },
}

#[derive(Subcommand)]
enum SecretAction {
    /// Print a random secret suitable for `GARCOM_SESSION_SECRET`
    Generate,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print a sealed session cookie value
    Seal {
        /// Backend user id
        #[arg(long)]
        user_id: String,

        /// Role (`ADMIN`, `MANAGER`, `ATTENDANT`, `CLIENT`, `GUEST`)
        #[arg(long)]
        role: String,

        /// Bearer token for backend calls
        #[arg(long)]
        token: String,

        /// Restaurant scope
        #[arg(long)]
        restaurant_id: Option<String>,

        /// Unit scope
        #[arg(long)]
        unit_id: Option<String>,
    },
    /// Decrypt a session cookie value and print its payload
    Open {
        /// Cookie value
        value: String,
    },
}

#[derive(Subcommand)]
enum ApiAction {
    /// Issue an authenticated GET
    Get {
        /// Path relative to `GARCOM_API_BASE_URL`
        path: String,

        /// Bearer token (omit to call anonymously)
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Secret { action } => match action {
            SecretAction::Generate => commands::secret::generate(),
        },
        Commands::Session { action } => match action {
            SessionAction::Seal {
                user_id,
                role,
                token,
                restaurant_id,
                unit_id,
            } => {
                let args = commands::session::SealArgs {
                    user_id,
                    role,
                    token,
                    restaurant_id,
                    unit_id,
                };
                commands::session::seal(&args)?;
            }
            SessionAction::Open { value } => commands::session::open(&value)?,
        },
        Commands::Api { action } => match action {
            ApiAction::Get { path, token } => commands::api::get(&path, token).await?,
        },
    }
    Ok(())
}
