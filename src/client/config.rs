use secrecy::SecretString;

use crate::client::consts::{DEFAULT_ENDPOINT, VOLC_ACCESS_KEY, VOLC_APP_KEY};

/// Connection-level settings: where to connect and which identity headers
/// to present. Fixed for the lifetime of a connection.
pub struct Config {
    endpoint: String,
    app_key: String,
    access_key: SecretString,
    resource_id: Option<String>,
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoint = endpoint.to_string();
        self
    }

    pub fn with_app_key(mut self, app_key: &str) -> Self {
        self.config.app_key = app_key.to_string();
        self
    }

    pub fn with_access_key(mut self, access_key: &str) -> Self {
        self.config.access_key = SecretString::from(access_key.to_string());
        self
    }

    /// Overrides the voice-derived resource id lookup.
    pub fn with_resource_id(mut self, resource_id: &str) -> Self {
        self.config.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    // Sets the default values, with credentials pulled from the environment.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_key: std::env::var(VOLC_APP_KEY).unwrap_or_default(),
            access_key: std::env::var(VOLC_ACCESS_KEY).unwrap_or_default().into(),
            resource_id: None,
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn access_key(&self) -> &SecretString {
        &self.access_key
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
