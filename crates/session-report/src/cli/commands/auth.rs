//! Authentication commands for session-report

use crate::client::BearerToken;
use crate::config::CredentialStore;
use crate::error::{ReportError, Result};
use std::io::{self, Write};

/// Store a bearer token for the profile
pub async fn login(token: Option<String>, profile: Option<String>) -> Result<()> {
    let store = CredentialStore::new(profile)?;

    let token = match token {
        Some(t) => BearerToken::new(t),
        None => BearerToken::new(rpassword_prompt("Token: ")?),
    };

    if token.is_empty() {
        return Err(ReportError::invalid_param("token must not be empty"));
    }

    store.save_token(&token)?;

    println!("Token saved.");
    println!("Profile: {}", store.profile());

    Ok(())
}

/// Execute the logout command
pub async fn logout(profile: Option<String>) -> Result<()> {
    let store = CredentialStore::new(profile)?;

    if !store.has_credentials() {
        println!("Not logged in.");
        return Ok(());
    }

    store.clear()?;

    println!("Successfully logged out.");
    Ok(())
}

/// Execute the status command
pub async fn status(profile: Option<String>) -> Result<()> {
    let store = CredentialStore::new(profile)?;

    match store.load_token() {
        Ok(Some(_)) => {
            println!("Status: Logged in");
            println!("Profile: {}", store.profile());
        }
        Ok(None) => {
            println!("Status: Not logged in");
            println!("Run 'session-report auth login' to authenticate.");
        }
        Err(_) => {
            println!("Status: Credentials corrupted");
            println!("Run 'session-report auth logout' then 'session-report auth login' to fix.");
        }
    }

    Ok(())
}

/// Load the profile's token or fail with a login hint
pub fn require_token(store: &CredentialStore) -> Result<BearerToken> {
    store.load_token()?.ok_or(ReportError::NotAuthenticated)
}

/// Prompt for the token without echoing
fn rpassword_prompt(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let token = rpassword::read_password()?;

    Ok(token)
}
