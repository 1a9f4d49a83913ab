use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use userdesk::cli::create_admin;
use userdesk_client::{ApiClient, ClientStore, FileTokenStorage, HttpTransport, StoreState};
use userdesk_config::{ClientConfig, ServerConfig};
use userdesk_db::{PgStore, connect};

#[derive(Parser)]
#[command(name = "userdesk-cli")]
#[command(about = "Userdesk CLI - Administrative tools for Userdesk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account directly in the database
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Log in against the API and store the token
    Login {
        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// List users
    Users,
    /// List roles
    Roles,
    /// Delete a user by id
    DeleteUser { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(name, email, password).await,
        Commands::Login { email, password } => handle_login(email, password).await,
        Commands::Logout => {
            client_store()?.logout();
            println!("Logged out.");
            Ok(())
        }
        Commands::Users => {
            let store = client_store()?;
            store.fetch_users().await;
            print_users(&store.snapshot())
        }
        Commands::Roles => {
            let store = client_store()?;
            store.fetch_roles().await;
            let state = store.snapshot();
            fail_on_error(&state)?;
            for role in &state.roles {
                println!("{:>4}  {}", role.id, role.name);
            }
            Ok(())
        }
        Commands::DeleteUser { id } => {
            let store = client_store()?;
            store.fetch_users().await;
            store.delete_user(id).await;
            print_users(&store.snapshot())
        }
    }
}

fn client_store() -> anyhow::Result<ClientStore<HttpTransport>> {
    let config = ClientConfig::from_env();
    let transport = HttpTransport::from_config(&config).context("Failed to build HTTP client")?;
    let tokens = std::sync::Arc::new(FileTokenStorage::new(&config.token_dir));
    Ok(ClientStore::new(ApiClient::new(transport, tokens)))
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

fn prompt_password(value: Option<String>, confirm: bool) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut password = Password::new().with_prompt("Password");
    if confirm {
        password = password.with_confirmation("Confirm password", "Passwords don't match");
    }
    Ok(password.interact()?)
}

fn fail_on_error(state: &StoreState) -> anyhow::Result<()> {
    match &state.error {
        Some(error) => bail!("{}", error),
        None => Ok(()),
    }
}

fn print_users(state: &StoreState) -> anyhow::Result<()> {
    fail_on_error(state)?;
    for user in &state.users {
        println!(
            "{:>4}  {:<24} {:<32} role {}",
            user.id, user.name, user.email, user.role_id
        );
    }
    Ok(())
}

async fn handle_create_admin(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let Some(database_url) = ServerConfig::from_env().database_url else {
        bail!("DATABASE_URL must be set to create an admin");
    };

    let name = prompt(name, "Name")?;
    let email = prompt(email, "Email address")?;
    let password = prompt_password(password, true)?;

    let pool = connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let store = PgStore::new(pool);

    let admin = create_admin(&store, &name, &email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.public_message()))?;

    println!("Admin created successfully.");
    println!("   Id: {}", admin.id);
    println!("   Email: {}", admin.email);
    Ok(())
}

async fn handle_login(email: Option<String>, password: Option<String>) -> anyhow::Result<()> {
    let email = prompt(email, "Email address")?;
    let password = prompt_password(password, false)?;

    let store = client_store()?;
    if !store.login(&email, &password).await {
        bail!(
            "{}",
            store.error().unwrap_or_else(|| "Login failed".to_string())
        );
    }

    println!("Logged in as {}.", email);
    Ok(())
}
