use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_console::cli::{commands, Cli, Commands, UsersAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init().await,
        Commands::Login {
            demo,
            username,
            password,
        } => commands::login(demo, username, password).await,
        Commands::Logout => commands::logout().await,
        Commands::Whoami => commands::whoami().await,
        Commands::Users { action } => match action {
            UsersAction::List { format } => commands::users_list(format).await,
            UsersAction::Show { id } => commands::users_show(&id).await,
            UsersAction::Create {
                username,
                role,
                theme,
            } => commands::users_create(username, role, theme).await,
            UsersAction::SetRole { id, role } => commands::users_set_role(&id, role).await,
            UsersAction::SetTheme { id, theme } => commands::users_set_theme(&id, theme).await,
            UsersAction::Delete { id, force } => commands::users_delete(&id, force).await,
        },
        Commands::Theme { value } => commands::theme(value).await,
        Commands::Language { value } => commands::language(value).await,
    }
}
