//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use crate::access::AccessPolicy;
use crate::api::{ApiClient, NewUser};
use crate::auth::{callback, AuthService, IdentityProvider, KeycloakProvider};
use crate::cli::{
    confirm, error, info, print_session, print_user_detail, print_user_table, success, warn,
    LanguageArg, OutputFormat, RoleArg, ThemeArg,
};
use crate::config::{self, Config};
use crate::error::Error;
use crate::prefs::Preferences;
use crate::session::{Role, SessionStore};
use crate::storage::Storage;
use crate::ui;

/// Everything a command needs, wired together once per invocation.
struct AppContext {
    config: Config,
    auth: AuthService,
    api: ApiClient,
    prefs: Preferences,
}

/// Load config, rehydrate the session, and complete the auth handshake.
async fn build_context() -> Result<AppContext> {
    let config = config::load_config()?;
    let storage = Storage::open(&config.storage.path);
    let store = SessionStore::restore(storage.clone());
    let provider: Arc<dyn IdentityProvider> =
        Arc::new(KeycloakProvider::new(config.provider.clone()));

    let auth = AuthService::with_provider(store.clone(), provider.clone());
    auth.initialize().await;

    let api = ApiClient::new(&config.api.base_url, store, Some(provider))?;
    let prefs = Preferences::new(storage);

    Ok(AppContext {
        config,
        auth,
        api,
        prefs,
    })
}

/// Initialize a new admin-console.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("admin-console.toml");

    if config_path.exists() {
        warn("admin-console.toml already exists");
        return Ok(());
    }

    fs::write(config_path, config::default_config_content())?;

    success("Created admin-console.toml");
    info("Edit the configuration file and run 'admin-console login' to sign in");

    Ok(())
}

/// Log in with the demo credentials or through the identity provider
pub async fn login(demo: bool, username: Option<String>, password: Option<String>) -> Result<()> {
    let ctx = build_context().await?;

    if ctx.auth.store().is_authenticated() {
        warn("Already logged in. Run 'admin-console logout' first to switch accounts.");
        return Ok(());
    }

    let session = if demo {
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) => (u, p),
            _ => ui::login_prompt()?,
        };
        match ctx.auth.login_demo(&username, &password) {
            Ok(session) => session,
            Err(e @ Error::InvalidCredentials) => {
                error(&e.to_string());
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        let request = ctx.auth.begin_login()?;
        info("Open this URL in your browser to sign in:");
        println!("\n  {}\n", request.url);
        info("Waiting for the identity provider to redirect back...");

        let code = callback::receive_code(ctx.config.provider.callback_port, &request.state).await?;
        ctx.auth.complete_login(&code, &request.redirect_uri).await?
    };

    success(&format!(
        "Logged in as {} ({})",
        session.username, session.role
    ));
    Ok(())
}

/// Log out and end the provider session
pub async fn logout() -> Result<()> {
    let ctx = build_context().await?;

    if !ctx.auth.store().is_authenticated() {
        info("Not logged in");
        return Ok(());
    }

    // The local session is cleared even when the provider cannot be reached
    if let Err(e) = ctx.auth.logout().await {
        warn(&format!("Provider logout incomplete: {}", e));
    }
    success("Logged out");
    Ok(())
}

/// Show the current session
pub async fn whoami() -> Result<()> {
    let ctx = build_context().await?;

    let state = ctx.auth.store().snapshot();
    if !ui::check_access(&state, &AccessPolicy::any_authenticated()) {
        return Ok(());
    }

    // Guard granted, so the session is present
    if let Some(session) = state.session {
        print_session(&session);
    }
    Ok(())
}

/// List all users
pub async fn users_list(format: OutputFormat) -> Result<()> {
    let ctx = build_context().await?;

    let state = ctx.auth.store().snapshot();
    if !ui::check_access(&state, &AccessPolicy::any_authenticated()) {
        return Ok(());
    }

    match ctx.api.list_users().await {
        Ok(users) => {
            match format {
                OutputFormat::Table => print_user_table(&users),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
            }
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to fetch users: {}", e));
            Err(e.into())
        }
    }
}

/// Show one user
pub async fn users_show(id: &str) -> Result<()> {
    let ctx = build_context().await?;

    let state = ctx.auth.store().snapshot();
    if !ui::check_access(&state, &AccessPolicy::any_authenticated()) {
        return Ok(());
    }

    match ctx.api.get_user(id).await {
        Ok(user) => {
            print_user_detail(&user);
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to fetch user {}: {}", id, e));
            Err(e.into())
        }
    }
}

/// Create a user (SuperAdmin only)
pub async fn users_create(username: String, role: RoleArg, theme: ThemeArg) -> Result<()> {
    let ctx = build_context().await?;

    let state = ctx.auth.store().snapshot();
    if !ui::check_access(&state, &AccessPolicy::roles([Role::SuperAdmin])) {
        return Ok(());
    }

    let new_user = NewUser {
        username,
        role: role.into(),
        theme: theme.into(),
    };
    match ctx.api.create_user(&new_user).await {
        Ok(user) => {
            success(&format!("Created user {} ({})", user.username, user.id));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create user: {}", e));
            Err(e.into())
        }
    }
}

/// Change a user's role (SuperAdmin only)
pub async fn users_set_role(id: &str, role: RoleArg) -> Result<()> {
    let ctx = build_context().await?;

    let state = ctx.auth.store().snapshot();
    if !ui::check_access(&state, &AccessPolicy::roles([Role::SuperAdmin])) {
        return Ok(());
    }

    let actor = state.session.clone().expect("granted decision implies a session");
    match ctx.api.set_user_role(&actor, id, role.into()).await {
        Ok(user) => {
            success(&format!("Changed role of {} to {}", user.username, user.role));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to update user {}: {}", id, e));
            Err(e.into())
        }
    }
}

/// Assign a theme to a user (SuperAdmin or Admin)
pub async fn users_set_theme(id: &str, theme: ThemeArg) -> Result<()> {
    let ctx = build_context().await?;

    let state = ctx.auth.store().snapshot();
    if !ui::check_access(&state, &AccessPolicy::roles([Role::SuperAdmin, Role::Admin])) {
        return Ok(());
    }

    let actor = state.session.clone().expect("granted decision implies a session");
    match ctx.api.set_user_theme(&actor, id, theme.into()).await {
        Ok(user) => {
            success(&format!("Assigned theme {} to {}", user.theme, user.username));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to update user {}: {}", id, e));
            Err(e.into())
        }
    }
}

/// Delete a user (SuperAdmin only)
pub async fn users_delete(id: &str, force: bool) -> Result<()> {
    let ctx = build_context().await?;

    let state = ctx.auth.store().snapshot();
    if !ui::check_access(&state, &AccessPolicy::roles([Role::SuperAdmin])) {
        return Ok(());
    }

    if !force && !confirm(&format!("Delete user {}?", id)) {
        info("Aborted");
        return Ok(());
    }

    match ctx.api.delete_user(id).await {
        Ok(()) => {
            success(&format!("Deleted user {}", id));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to delete user {}: {}", id, e));
            Err(e.into())
        }
    }
}

/// Show or set the theme preference
pub async fn theme(value: Option<ThemeArg>) -> Result<()> {
    let ctx = build_context().await?;

    match value {
        Some(theme) => {
            ctx.prefs.set_theme(theme.into())?;
            success(&format!("Theme set to {}", ctx.prefs.theme()));
        }
        None => info(&format!("Theme: {}", ctx.prefs.theme())),
    }
    Ok(())
}

/// Show or set the language preference
pub async fn language(value: Option<LanguageArg>) -> Result<()> {
    let ctx = build_context().await?;

    match value {
        Some(language) => {
            ctx.prefs.set_language(language.into())?;
            success(&format!("Language set to {}", ctx.prefs.language()));
        }
        None => info(&format!("Language: {}", ctx.prefs.language())),
    }
    Ok(())
}
