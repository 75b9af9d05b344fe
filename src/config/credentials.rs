//! API credential resolution.
//!
//! # Security
//! - Keys come ONLY from environment variables named in the chain config
//! - Keys are never logged; `Debug` shows which chains have one

use std::collections::HashMap;
use std::fmt;

use crate::config::loader::ConfigError;
use crate::config::schema::ChainConfig;

/// API keys by chain name, resolved once at startup.
#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<String, String>,
}

impl Credentials {
    /// Resolve every chain's key from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// An unreadable or malformed one is skipped with a warning.
    pub fn from_env(chains: &[ChainConfig]) -> Result<Self, ConfigError> {
        if let Err(e) = dotenv_outcome(dotenv::dotenv()) {
            warn_dotenv(&e);
        }
        Self::resolve(chains, |var| std::env::var(var).ok())
    }

    /// Resolve every chain's key through `lookup`.
    ///
    /// Each missing or blank variable is reported; none are silently skipped.
    pub fn resolve<F>(chains: &[ChainConfig], lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut keys = HashMap::new();
        let mut missing = Vec::new();

        for chain in chains {
            let Some(var) = &chain.api_key_env else {
                continue;
            };
            match lookup(var).map(|v| v.trim().to_string()) {
                Some(key) if !key.is_empty() => {
                    keys.insert(chain.name.clone(), key);
                }
                _ => missing.push(var.clone()),
            }
        }

        if missing.is_empty() {
            Ok(Self { keys })
        } else {
            Err(ConfigError::MissingCredentials(missing))
        }
    }

    /// Key for a chain, if it needs one.
    pub fn get(&self, chain: &str) -> Option<&str> {
        self.keys.get(chain).map(String::as_str)
    }
}

/// Whether a `.env` file was applied. A missing file is not an error.
fn dotenv_outcome<T>(result: Result<T, dotenv::Error>) -> Result<bool, dotenv::Error> {
    match result {
        Ok(_) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

// A parse error carries the offending line, which may hold a key.
fn warn_dotenv(error: &dotenv::Error) {
    match error {
        dotenv::Error::LineParse(_, index) => {
            tracing::warn!(index = index, "Malformed .env file ignored");
        }
        other => tracing::warn!(error = %other, ".env file could not be loaded"),
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chains: Vec<_> = self.keys.keys().collect();
        chains.sort();
        f.debug_struct("Credentials").field("chains", &chains).finish()
    }
}
