//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use flogin_core::api::{ApiClient, ProductQuery};
use flogin_core::config::{self, Config};
use flogin_core::logging;
use flogin_core::routes::Navigator;
use flogin_core::session::{AuthState, SessionStore};
use flogin_core::validation::ProductFormData;

mod commands;

#[derive(Parser)]
#[command(name = "flogin")]
#[command(version)]
#[command(about = "Product catalogue client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides config)
    #[arg(long, global = true, env = config::BASE_URL_ENV, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out (clear the stored token)
    Logout,
    /// Show the current session
    Status,
    /// Show the dashboard
    Dashboard,
    /// Manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Editable product fields shared by create and edit.
#[derive(clap::Args, Debug, Clone, Default)]
struct ProductFields {
    /// Product name (3-100 characters)
    #[arg(long)]
    name: Option<String>,
    /// Price (greater than 0)
    #[arg(long, allow_hyphen_values = true)]
    price: Option<String>,
    /// Quantity in stock (0-99999)
    #[arg(long, allow_hyphen_values = true)]
    quantity: Option<String>,
    /// Category
    #[arg(long)]
    category: Option<String>,
    /// Description (up to 500 characters)
    #[arg(long)]
    description: Option<String>,
}

#[derive(clap::Subcommand)]
enum ProductCommands {
    /// List products
    List {
        /// Filter by name
        #[arg(long)]
        name: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Page index (zero-based)
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        size: Option<u32>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one product
    Show {
        #[arg(value_name = "ID")]
        id: i64,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Edit a product (unset fields keep their current value)
    Edit {
        #[arg(value_name = "ID")]
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
    /// Save the backend base URL to the config file
    SetBaseUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("load config")?;
    let _log_guard = logging::init(&config.log)?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli, config).await })
}

fn build_client(config: &Config, base_url: Option<&str>) -> Result<ApiClient> {
    let auth = AuthState::initialize(SessionStore::default());
    let client = ApiClient::from_config(config, base_url, auth, Navigator::default())?;
    tracing::debug!(base_url = client.base_url(), "api client ready");
    Ok(client)
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let Cli { command, base_url } = cli;
    let client = || build_client(&config, base_url.as_deref());

    // default to the dashboard
    let Some(command) = command else {
        return commands::dashboard::show(&client()?);
    };

    match command {
        Commands::Login { username, password } => {
            commands::auth::login(&client()?, username, password).await
        }
        Commands::Logout => commands::auth::logout(&client()?),
        Commands::Status => {
            commands::auth::status(&client()?);
            Ok(())
        }
        Commands::Dashboard => commands::dashboard::show(&client()?),

        Commands::Products { command } => {
            let client = client()?;
            match command {
                ProductCommands::List {
                    name,
                    category,
                    page,
                    size,
                    json,
                } => {
                    let query = ProductQuery {
                        name,
                        category,
                        page,
                        size,
                    };
                    commands::products::list(&client, &query, json).await
                }
                ProductCommands::Show { id, json } => {
                    commands::products::show(&client, id, json).await
                }
                ProductCommands::Create { fields } => {
                    commands::products::create(&client, &fields.into()).await
                }
                ProductCommands::Edit { id, fields } => {
                    commands::products::edit(&client, id, fields.into()).await
                }
                ProductCommands::Delete { id, yes } => {
                    commands::products::delete(&client, id, yes).await
                }
            }
        }

        // Config commands work without a valid base URL or session.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
            ConfigCommands::SetBaseUrl { url } => commands::config::set_base_url(&url),
        },
    }
}

impl From<ProductFields> for ProductFormData {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            price: fields.price,
            quantity: fields.quantity,
            description: fields.description,
            category: fields.category,
        }
    }
}
