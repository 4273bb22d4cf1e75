//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::api::UserRecord;
use crate::session::{Role, Session};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Ask for confirmation before destructive operations
pub fn confirm(message: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Format a role as a colored string
pub fn format_role(role: Role) -> String {
    match role {
        Role::SuperAdmin => role.to_string().red().to_string(),
        Role::Admin => role.to_string().yellow().to_string(),
        Role::User => role.to_string().green().to_string(),
    }
}

/// Print a table of users
pub fn print_user_table(users: &[UserRecord]) {
    if users.is_empty() {
        info("No users found");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Theme").fg(Color::Cyan),
        ]);

    for user in users {
        table.add_row(vec![
            user.id.clone(),
            user.username.clone(),
            format_role(user.role),
            user.theme.to_string(),
        ]);
    }

    println!("{}", table);
}

/// Print a single user in detail
pub fn print_user_detail(user: &UserRecord) {
    println!("{}: {}", "ID".bold(), user.id);
    println!("{}: {}", "Username".bold(), user.username);
    println!("{}: {}", "Role".bold(), format_role(user.role));
    println!("{}: {}", "Theme".bold(), user.theme);
}

/// Print the current session for whoami
pub fn print_session(session: &Session) {
    println!("{}: {}", "Logged in as".bold(), session.username);
    println!("{}: {}", "User ID".bold(), session.id);
    println!("{}: {}", "Role".bold(), format_role(session.role));
    let variant = if session.token.is_some() {
        "identity provider"
    } else {
        "demo credentials"
    };
    println!("{}: {}", "Login variant".bold(), variant);
}
