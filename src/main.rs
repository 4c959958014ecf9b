use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foundation_portal::api::{create_router, AppState};
use foundation_portal::auth::{AuthService, Role, SessionManager, VolunteerSignUp};
use foundation_portal::config::AppConfig;
use foundation_portal::database::Database;

#[derive(Parser)]
#[command(name = "foundation-portal")]
#[command(about = "Grant applications, donations and dashboards for the foundation")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./portal.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,

    /// Create a staff, board, admin or volunteer account
    CreateUser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: String,

        /// admin, staff, board or volunteer
        #[arg(long, default_value = "staff")]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foundation_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    info!("Configuration loaded");

    let database = Database::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    database.run_migrations().await.context("Failed to run migrations")?;
    info!("Database migrations completed");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, database).await,
        Commands::Migrate => Ok(()),
        Commands::CreateUser {
            email,
            password,
            name,
            role,
        } => {
            let sessions = SessionManager::new(&config.jwt_secret, config.session_ttl_hours)?;
            let auth = AuthService::new(database, sessions);
            if role == Role::Volunteer {
                let signup = VolunteerSignUp {
                    email,
                    password,
                    full_name: name,
                    phone: None,
                    skills: None,
                };
                let (session, profile) = auth.sign_up_volunteer(&signup).await?;
                info!(
                    "Created volunteer account {} (id {}, profile {})",
                    session.user.email, session.user.id, profile.id
                );
            } else {
                let user = auth.create_user(&email, &password, &name, role).await?;
                info!("Created {} account {} (id {})", user.role, user.email, user.id);
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, database: Database) -> anyhow::Result<()> {
    info!("Starting foundation portal");

    let addr = config.bind_address();
    let app = create_router(AppState::new(config, database)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
