//! CLI interface for the admin console

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

use crate::prefs::{Language, Theme};
use crate::session::Role;

#[derive(Parser)]
#[command(name = "admin-console")]
#[command(version)]
#[command(about = "Terminal admin console with identity-provider-backed sign-in", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new admin-console.toml configuration file
    Init,

    /// Log in, either through the identity provider or with the demo credentials
    Login {
        /// Use the built-in demo credentials instead of the identity provider
        #[arg(long)]
        demo: bool,

        /// Username for the demo login (prompted when omitted)
        #[arg(short, long, requires = "demo")]
        username: Option<String>,

        /// Password for the demo login (prompted when omitted)
        #[arg(short, long, requires = "demo")]
        password: Option<String>,
    },

    /// Log out and end the provider session
    Logout,

    /// Show the current session
    Whoami,

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Show or set the theme preference
    Theme {
        /// New theme; prints the current one when omitted
        value: Option<ThemeArg>,
    },

    /// Show or set the language preference
    Language {
        /// New language; prints the current one when omitted
        value: Option<LanguageArg>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List all users
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one user
    Show {
        /// User id
        id: String,
    },

    /// Create a user
    Create {
        /// Username for the new account
        username: String,

        /// Role for the new account
        #[arg(short, long, default_value = "user")]
        role: RoleArg,

        /// Theme for the new account
        #[arg(short, long, default_value = "auto")]
        theme: ThemeArg,
    },

    /// Change a user's role
    SetRole {
        /// User id
        id: String,

        /// New role
        role: RoleArg,
    },

    /// Assign a theme to a user
    SetTheme {
        /// User id
        id: String,

        /// New theme
        theme: ThemeArg,
    },

    /// Delete a user
    Delete {
        /// User id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RoleArg {
    SuperAdmin,
    Admin,
    User,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::SuperAdmin => Role::SuperAdmin,
            RoleArg::Admin => Role::Admin,
            RoleArg::User => Role::User,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ThemeArg {
    Light,
    Dark,
    Auto,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Auto => Theme::Auto,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LanguageArg {
    En,
    De,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::De => Language::De,
        }
    }
}
