//! Store location and credentials
//!
//! Resolves where the document store lives and how to log in. The service
//! address is mandatory; everything else is optional.

use url::Url;

use super::errors::{StoreError, StoreResult};

/// Database holding the song collection
pub const DEFAULT_DATABASE: &str = "songs";

/// Collection name for song records
pub const DEFAULT_COLLECTION: &str = "songs";

/// Where the document store lives
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Host (optionally `host:port`, or a comma separated seed list)
    pub service: String,

    /// Username, used only together with `password`
    pub username: Option<String>,

    /// Password, used only together with `username`
    pub password: Option<String>,

    /// Port appended when `service` does not name one
    pub port: Option<u16>,

    pub database: String,
    pub collection: String,
}

impl StoreConfig {
    /// Create a config for a service address with no credentials
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            username: None,
            password: None,
            port: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// `mongodb://[user:pass@]service[:port]` with credentials percent-encoded
    pub fn connection_url(&self) -> StoreResult<String> {
        let invalid = || StoreError::InvalidAddress(self.service.clone());

        let mut url = Url::parse(&format!("mongodb://{}", self.service)).map_err(|_| invalid())?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }

        if url.port().is_none() {
            if let Some(port) = self.port {
                url.set_port(Some(port)).map_err(|_| invalid())?;
            }
        }

        if let Some((user, pass)) = self.credentials() {
            url.set_username(user).map_err(|_| invalid())?;
            url.set_password(Some(pass)).map_err(|_| invalid())?;
        }

        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Address safe for logs: no credentials
    pub fn redacted_address(&self) -> String {
        match (self.port, self.service.contains(':')) {
            (Some(port), false) => format!("{}:{}", self.service, port),
            _ => self.service.clone(),
        }
    }
}
