//! Terminal screens and the screen-level access gate

use crate::access::{self, AccessDecision, AccessPolicy};
use crate::error::Result;
use crate::session::SessionState;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

/// Apply the access decision layer in front of one screen.
///
/// Returns true only for a granted decision; every other decision renders its
/// placeholder or notice here and returns false. Denial is an ordinary
/// outcome, not an error.
pub fn check_access(state: &SessionState, policy: &AccessPolicy) -> bool {
    match access::evaluate(state, policy) {
        AccessDecision::Granted => true,
        AccessDecision::Pending => {
            println!("{}", "Loading authentication...".dimmed());
            false
        }
        AccessDecision::DeniedNoSession => {
            // The login entry point replaces this screen; there is no way
            // back into the guarded surface
            println!(
                "{} {}",
                "✗".red(),
                "You are not logged in. Run 'admin-console login' first."
            );
            false
        }
        AccessDecision::DeniedWrongRole { required, fallback } => {
            match fallback {
                Some(text) => println!("{} {}", "✗".red(), text),
                None => println!("{} {}", "✗".red(), access::denial_notice(&required)),
            }
            false
        }
    }
}

/// Interactive credential prompt for the demo login.
pub fn login_prompt() -> Result<(String, String)> {
    let theme = ColorfulTheme::default();
    let username: String = Input::with_theme(&theme)
        .with_prompt("Username")
        .interact_text()
        .map_err(|e| crate::error::Error::Other(e.to_string()))?;
    let password: String = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()
        .map_err(|e| crate::error::Error::Other(e.to_string()))?;
    Ok((username, password))
}
