//! Configuration types for the registry client.

use std::time::Duration;

/// Configuration for the registry control-API client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Control endpoint URL (e.g., "<https://registry.example.com>").
    pub url: String,

    /// Authentication configuration.
    pub auth: RegistryAuth,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl RegistryConfig {
    /// Creates a new registry configuration with the given control endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use lethe_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new("https://registry.example.com");
    /// assert_eq!(config.url, "https://registry.example.com");
    /// ```
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: RegistryAuth::None,
            timeout: Duration::from_secs(60),
            user_agent: format!("lethe-registry/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the authentication method.
    #[must_use]
    pub fn with_auth(mut self, auth: RegistryAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Authentication methods for registry access.
#[derive(Debug, Clone)]
pub enum RegistryAuth {
    /// No authentication (for local development).
    None,

    /// Basic authentication (username/password or username/token).
    Basic {
        /// Username.
        username: String,
        /// Password or token.
        password: String,
    },

    /// Bearer token authentication (`OAuth2` / service account).
    Bearer {
        /// Token value.
        token: String,
    },
}

impl RegistryAuth {
    /// Creates basic authentication.
    ///
    /// # Examples
    ///
    /// ```
    /// use lethe_registry::RegistryAuth;
    ///
    /// let auth = RegistryAuth::basic("user", "pass");
    /// ```
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates bearer token authentication.
    ///
    /// # Examples
    ///
    /// ```
    /// use lethe_registry::RegistryAuth;
    ///
    /// let auth = RegistryAuth::bearer("my-token");
    /// ```
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = RegistryConfig::new("https://example.com");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(matches!(config.auth, RegistryAuth::None));
    }

    #[test]
    fn test_config_with_timeout() {
        let config =
            RegistryConfig::new("https://example.com").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_basic_auth() {
        let auth = RegistryAuth::basic("user", "pass");
        assert!(matches!(
            auth,
            RegistryAuth::Basic { username, password }
            if username == "user" && password == "pass"
        ));
    }

    #[test]
    fn test_bearer_auth() {
        let auth = RegistryAuth::bearer("token123");
        assert!(matches!(
            auth,
            RegistryAuth::Bearer { token } if token == "token123"
        ));
    }
}
