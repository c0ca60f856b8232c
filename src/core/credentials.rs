//! API key resolution.
//!
//! The key comes from the environment, the config file, or the system
//! keychain, in that order. It is never logged.

use keyring::Entry;
use thiserror::Error;

const SERVICE_NAME: &str = "expense-analyst";
const KEYRING_ACCOUNT: &str = "openai";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPEN_API_KEY", "OPENAI_API_KEY"];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keyring error: {0}")]
    KeyringError(#[from] keyring::Error),

    #[error(
        "Credential not found: {0}. Set OPEN_API_KEY, add llm.api_key to the config file, \
         or run `expense-analyst set-key`"
    )]
    NotFound(String),

    #[error("Invalid credential format")]
    InvalidFormat,
}

pub type Result<T> = std::result::Result<T, CredentialError>;

/// Where the resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment(&'static str),
    ConfigFile,
    Keyring,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Environment(var) => write!(f, "environment ({var})"),
            KeySource::ConfigFile => write!(f, "config file"),
            KeySource::Keyring => write!(f, "system keyring"),
        }
    }
}

// ============================================================================
// Credential Manager
// ============================================================================

pub struct CredentialManager {
    service: String,
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialManager {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Store a raw string secret
    pub fn store_secret(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        log::info!("Stored secret for key: {}", key);
        Ok(())
    }

    /// Retrieve a raw string secret
    pub fn get_secret(&self, key: &str) -> Result<String> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => Err(CredentialError::NotFound(key.to_string())),
            Err(e) => Err(CredentialError::KeyringError(e)),
        }
    }

    pub fn store_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::InvalidFormat);
        }
        self.store_secret(KEYRING_ACCOUNT, key)
    }

    pub fn get_api_key(&self) -> Result<String> {
        self.get_secret(KEYRING_ACCOUNT)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the API key from the process environment, `config_key`, then the keyring.
pub fn resolve_api_key(config_key: Option<&str>) -> Result<(String, KeySource)> {
    resolve_api_key_with(
        |var| std::env::var(var).ok(),
        config_key,
        || CredentialManager::new().get_api_key(),
    )
}

/// Resolution with injectable lookups. Blank values are skipped.
pub fn resolve_api_key_with(
    env: impl Fn(&str) -> Option<String>,
    config_key: Option<&str>,
    keyring: impl FnOnce() -> Result<String>,
) -> Result<(String, KeySource)> {
    fn present(value: &str) -> Option<String> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    for var in API_KEY_ENV_VARS {
        if let Some(key) = env(var).as_deref().and_then(present) {
            log::debug!("API key found in {var}");
            return Ok((key, KeySource::Environment(var)));
        }
    }

    if let Some(key) = config_key.and_then(present) {
        log::debug!("API key found in config file");
        return Ok((key, KeySource::ConfigFile));
    }

    match keyring() {
        Ok(key) => match present(&key) {
            Some(key) => Ok((key, KeySource::Keyring)),
            None => Err(CredentialError::NotFound("OpenAI API key".to_string())),
        },
        Err(CredentialError::NotFound(_)) => {
            Err(CredentialError::NotFound("OpenAI API key".to_string()))
        }
        Err(e) => {
            log::warn!("Keyring lookup failed: {e}");
            Err(CredentialError::NotFound("OpenAI API key".to_string()))
        }
    }
}

/// Mask an API key for display (show first 4 and last 4 chars)
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "********".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}
