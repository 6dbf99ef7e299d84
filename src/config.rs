use std::fmt;
use std::time::Duration;

/// Connection parameters for one tidyDNS deployment.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String, // e.g. "https://tidydns.example.net"
    pub username: String,
    pub password: String,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base URL without trailing slashes.
    pub fn base_url_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute URL for an API path such as `/=/zone`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url_root(), path)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
