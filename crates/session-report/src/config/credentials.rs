use crate::client::BearerToken;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;

const TOKEN_FILENAME: &str = "token.json";

/// Manages the bearer token of one profile on disk.
///
/// The token is handed explicitly to the client; nothing reads it from ambient
/// state.
pub struct CredentialStore {
    profile: String,
    base_dir: PathBuf,
}

impl CredentialStore {
    /// Create a new credential store for the given profile
    pub fn new(profile: Option<String>) -> Result<Self> {
        let profile = profile.unwrap_or_else(|| "default".to_string());
        let base_dir = super::data_dir()?.join(&profile);
        super::ensure_dir(&base_dir)?;

        Ok(Self { profile, base_dir })
    }

    /// Create a credential store with a custom base directory (for testing)
    pub fn with_dir(profile: impl Into<String>, base_dir: PathBuf) -> Result<Self> {
        let profile = profile.into();
        let dir = base_dir.join(&profile);
        super::ensure_dir(&dir)?;

        Ok(Self {
            profile,
            base_dir: dir,
        })
    }

    /// Get the profile name
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Save the token, readable by the owner only on Unix
    pub fn save_token(&self, token: &BearerToken) -> Result<()> {
        let path = self.base_dir.join(TOKEN_FILENAME);
        let json = serde_json::to_string_pretty(token)?;
        fs::write(&path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Load the token, `None` when the profile has not logged in
    pub fn load_token(&self) -> Result<Option<BearerToken>> {
        let path = self.base_dir.join(TOKEN_FILENAME);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let token: BearerToken = serde_json::from_str(&json)?;
        Ok(Some(token))
    }

    /// Check if credentials exist
    pub fn has_credentials(&self) -> bool {
        self.base_dir.join(TOKEN_FILENAME).exists()
    }

    /// Clear the stored token
    pub fn clear(&self) -> Result<()> {
        let path = self.base_dir.join(TOKEN_FILENAME);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
