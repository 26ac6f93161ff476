//! Authentication collaborator.
//!
//! The login flow itself lives outside this crate. What the core needs is a
//! bearer token and a yes/no signal that gates every gateway request.

/// Supplies credentials to the sync gateway.
pub trait AuthProvider: Send + Sync {
    /// Whether requests may be sent at all.
    fn is_authenticated(&self) -> bool;

    /// Token for the `Authorization: Bearer` header, if any.
    fn bearer_token(&self) -> Option<String>;
}

/// Development servers that accept anonymous requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn is_authenticated(&self) -> bool {
        true
    }

    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A token handed over by the login screen; `None` means logged out.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn logged_out() -> Self {
        Self(None)
    }
}

impl AuthProvider for StaticToken {
    fn is_authenticated(&self) -> bool {
        self.0.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn bearer_token(&self) -> Option<String> {
        self.0.clone().filter(|t| !t.is_empty())
    }
}

const TOKEN_KEY: &str = "api_token";

/// Token persisted in the OS keyring.
#[derive(Debug, Clone, Default)]
pub struct KeyringAuth {
    token: Option<String>,
}

impl KeyringAuth {
    /// Load the stored token (logged out if absent or the keyring is unavailable).
    pub fn load() -> Self {
        let token = keyring_store::get(TOKEN_KEY).ok().flatten();
        Self { token }
    }

    /// Persist a token and use it for subsequent requests.
    pub fn login(&mut self, token: &str) -> Result<(), keyring::Error> {
        keyring_store::set(TOKEN_KEY, token)?;
        self.token = Some(token.to_string());
        Ok(())
    }

    /// Remove the stored token.
    pub fn logout(&mut self) -> Result<(), keyring::Error> {
        keyring_store::delete(TOKEN_KEY)?;
        self.token = None;
        Ok(())
    }
}

impl AuthProvider for KeyringAuth {
    fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.clone().filter(|t| !t.is_empty())
    }
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "socialspark";

    pub fn get(key: &str) -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)
    }

    pub fn delete(key: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
