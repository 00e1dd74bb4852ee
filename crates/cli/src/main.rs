//! Atelier CLI - Terminal front end for the marketplace backend.
//!
//! # Usage
//!
//! ```bash
//! # Check the backend is up
//! atelier health
//!
//! # Log in (password from ATELIER_PASSWORD, or prompted)
//! atelier login -e admin@example.com
//!
//! # Work the order queue
//! atelier orders list
//! atelier orders process 12
//! atelier orders complete 12
//!
//! # Work the custom request queue
//! atelier requests accept 4
//! ```
//!
//! # Environment Variables
//!
//! - `ATELIER_API_URL` - Backend base URL (default `http://localhost:8000`)
//! - `ATELIER_SESSION_FILE` - Where the credential is kept between runs
//! - `ATELIER_HTTP_TIMEOUT_SECS` - Per-request timeout
//! - `ATELIER_LOG_FORMAT` - `json` for JSON log lines, text otherwise
//! - `RUST_LOG` - Log filter (default `info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use atelier_client::{ApiClient, ClientConfig, FileSlot, SessionStore};
use atelier_core::{CustomRequestId, OrderId, ProductId, ProductQuery};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier marketplace admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,
    /// Log in as an admin
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show the admin the stored credential belongs to
    Whoami,
    /// Browse and manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Work the order queue
    Orders {
        #[command(subcommand)]
        action: OrderCommand,
    },
    /// Work the custom request queue
    Requests {
        #[command(subcommand)]
        action: RequestCommand,
    },
    /// Read page content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Upload a file, or delete an uploaded one
    #[command(args_conflicts_with_subcommands = true)]
    Upload {
        #[command(subcommand)]
        action: Option<UploadAction>,

        /// File to upload
        file: Option<std::path::PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(long)]
        category: Option<String>,

        /// Only featured products
        #[arg(long)]
        featured: bool,

        /// Number of products to skip
        #[arg(long)]
        skip: Option<u32>,

        /// Maximum number of products to return
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one product
    Show { id: ProductId },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum OrderCommand {
    /// List orders
    List,
    /// Start work on a pending order
    Process { id: OrderId },
    /// Mark a processing order as completed
    Complete { id: OrderId },
}

#[derive(Subcommand)]
enum RequestCommand {
    /// List custom requests
    List,
    /// Accept a pending request
    Accept { id: CustomRequestId },
    /// Reject a pending request
    Reject { id: CustomRequestId },
    /// Mark an accepted request as completed
    Complete { id: CustomRequestId },
}

#[derive(Subcommand)]
enum ContentAction {
    /// List content blocks
    List,
    /// Show one content block
    Show { key: String },
}

#[derive(Subcommand)]
enum UploadAction {
    /// Delete an uploaded file by its stored name
    Delete { name: String },
}

#[tokio::main]
async fn main() {
    // Defaults to info for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atelier_cli=info,atelier_client=info".into());

    // JSON lines when asked for, for piping into log tooling
    let json = std::env::var("ATELIER_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = ClientConfig::from_env()?;
    let session = SessionStore::open(FileSlot::new(&config.session_file))?;
    let api = ApiClient::new(&config, session)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Health => commands::auth::health(&api, &mut out).await?,
        Commands::Login { email } => commands::auth::login(&api, &email).await?,
        Commands::Logout => commands::auth::logout(&api).await?,
        Commands::Whoami => commands::auth::whoami(&api, &mut out).await?,
        Commands::Products { action } => match action {
            ProductAction::List {
                category,
                featured,
                skip,
                limit,
            } => {
                let query = ProductQuery {
                    skip,
                    limit,
                    category,
                    featured: featured.then_some(true),
                };
                commands::products::list(&api, &query, &mut out).await?;
            }
            ProductAction::Show { id } => commands::products::show(&api, id, &mut out).await?,
            ProductAction::Delete { id } => commands::products::delete(&api, id).await?,
        },
        Commands::Orders { action } => match action {
            OrderCommand::List => commands::orders::list(&api, &mut out).await?,
            OrderCommand::Process { id } => {
                commands::orders::process(&api, id, &mut out).await?;
            }
            OrderCommand::Complete { id } => {
                commands::orders::complete(&api, id, &mut out).await?;
            }
        },
        Commands::Requests { action } => match action {
            RequestCommand::List => commands::requests::list(&api, &mut out).await?,
            RequestCommand::Accept { id } => {
                commands::requests::accept(&api, id, &mut out).await?;
            }
            RequestCommand::Reject { id } => {
                commands::requests::reject(&api, id, &mut out).await?;
            }
            RequestCommand::Complete { id } => {
                commands::requests::complete(&api, id, &mut out).await?;
            }
        },
        Commands::Content { action } => match action {
            ContentAction::List => commands::content::list(&api, &mut out).await?,
            ContentAction::Show { key } => commands::content::show(&api, &key, &mut out).await?,
        },
        Commands::Upload { action, file } => match (action, file) {
            (Some(UploadAction::Delete { name }), _) => {
                commands::upload::delete(&api, &name).await?;
            }
            (None, Some(file)) => commands::upload::upload(&api, &file, &mut out).await?,
            (None, None) => return Err(CommandError::MissingArgument("FILE")),
        },
    }
    Ok(())
}
