//! Profile commands for session-report

use std::path::Path;

use super::auth::require_token;
use crate::cli::render::print_json;
use crate::cli::OutputFormat;
use crate::client::CoachClient;
use crate::config::{CredentialStore, Settings};
use crate::error::{ReportError, Result};
use crate::models::ProfileUpdate;
use crate::report::format_optional;

/// Show the logged-in user's profile
pub async fn show(format: OutputFormat, profile: Option<String>) -> Result<()> {
    let store = CredentialStore::new(profile)?;
    let token = require_token(&store)?;
    let client = CoachClient::new(&Settings::from_env()?)?;

    let user = client.fetch_profile(&token).await?;

    if format == OutputFormat::Json {
        return print_json(&user);
    }

    println!("User Profile");
    println!("{}", "-".repeat(40));
    println!("Username:     {}", user.username);
    println!("Role:         {}", user.role.as_deref().unwrap_or("-"));

    if user.is_cyclist() {
        println!("Height:       {} cm", format_optional(user.height_cm));
        println!("Weight:       {} kg", format_optional(user.weight_kg));
    }

    Ok(())
}

/// Update username, measurements and/or profile picture
pub async fn update(
    username: Option<String>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    picture: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    if username.is_none() && height_cm.is_none() && weight_kg.is_none() && picture.is_none() {
        return Err(ReportError::invalid_param(
            "nothing to update; pass --username, --height, --weight or --picture",
        ));
    }

    let store = CredentialStore::new(profile)?;
    let token = require_token(&store)?;
    let client = CoachClient::new(&Settings::from_env()?)?;

    if let Some(picture) = &picture {
        if !Path::new(picture).is_file() {
            return Err(ReportError::invalid_param(format!("File not found: {}", picture)));
        }
    }

    let current = client.fetch_profile(&token).await?;
    if !current.is_cyclist() && (height_cm.is_some() || weight_kg.is_some()) {
        println!("Height and weight only apply to cyclists; ignoring them.");
    }

    let update = ProfileUpdate::for_profile(&current, username, height_cm, weight_kg);
    client.update_profile(&token, &update).await?;

    if let Some(picture) = picture {
        println!("Uploading {}...", picture);
        client.upload_profile_picture(&token, Path::new(&picture)).await?;
    }

    println!("Profile updated successfully");

    Ok(())
}
