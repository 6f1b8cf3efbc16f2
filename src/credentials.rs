//! Stored credentials
//!
//! Layout under the config directory:
//!
//! ```text
//! ~/.config/nanotoot/
//! ├── profiles/<profile>.toml   # domain + access token
//! └── apps/<domain>.toml        # client id + secret from app registration
//! ```

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Access token for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub domain: String,
    pub access_token: String,
}

/// OAuth client registered with one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRegistration {
    pub client_id: String,
    pub client_secret: String,
}

/// Reads and writes credential files below a root directory
#[derive(Debug, Clone)]
pub struct CredentialStore {
    root: PathBuf,
}

impl CredentialStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn profile_path(&self, profile: &str) -> PathBuf {
        self.root
            .join("profiles")
            .join(format!("{}.toml", file_stem(profile)))
    }

    pub fn app_path(&self, domain: &str) -> PathBuf {
        self.root
            .join("apps")
            .join(format!("{}.toml", file_stem(domain)))
    }

    /// Saved credentials for `profile`, `None` if never logged in
    pub fn load_profile(&self, profile: &str) -> Result<Option<Credentials>> {
        read_toml(&self.profile_path(profile))
    }

    pub fn save_profile(&self, profile: &str, creds: &Credentials) -> Result<()> {
        write_toml(&self.profile_path(profile), creds)
    }

    pub fn load_app(&self, domain: &str) -> Result<Option<AppRegistration>> {
        read_toml(&self.app_path(domain))
    }

    pub fn save_app(&self, domain: &str, app: &AppRegistration) -> Result<()> {
        write_toml(&self.app_path(domain), app)
    }

    pub fn remove_app(&self, domain: &str) {
        remove_quietly(&self.app_path(domain));
    }
}

/// Keep path separators and other oddities out of file names
fn file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    toml::from_str(&contents)
        .map(Some)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let contents = toml::to_string(value).context("Failed to serialize credentials")?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    // Tokens are secrets
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to restrict {}", path.display()))?;
    }

    Ok(())
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}
