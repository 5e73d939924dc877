use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Base for invite and password-reset callback links
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub anon_key: Option<String>,
    /// When set, bearer tokens are verified locally instead of asking the service
    pub jwt_secret: Option<String>,
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::preset(environment).with_env_overrides()
    }

    pub fn preset(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key/value source. Unparseable values keep the preset.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("CAREFULL_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("CAREFULL_PUBLIC_URL") {
            self.server.public_url = non_blank(v).map(|u| u.trim_end_matches('/').to_string());
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = non_blank(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Identity overrides
        if let Some(v) = lookup("IDENTITY_URL") {
            self.identity.url = non_blank(v).map(|u| u.trim_end_matches('/').to_string());
        }
        if let Some(v) = lookup("IDENTITY_SERVICE_KEY") {
            self.identity.service_key = non_blank(v);
        }
        if let Some(v) = lookup("IDENTITY_ANON_KEY") {
            self.identity.anon_key = non_blank(v);
        }
        if let Some(v) = lookup("IDENTITY_JWT_SECRET") {
            self.identity.jwt_secret = non_blank(v);
        }
        if let Some(v) = lookup("IDENTITY_REQUEST_TIMEOUT") {
            self.identity.request_timeout = v.parse().unwrap_or(self.identity.request_timeout);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                public_url: None,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            identity: IdentityConfig {
                url: None,
                service_key: None,
                anon_key: None,
                jwt_secret: None,
                request_timeout: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                public_url: None,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            identity: IdentityConfig {
                url: None,
                service_key: None,
                anon_key: None,
                jwt_secret: None,
                request_timeout: 15,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.carefulliq.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                public_url: None,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            identity: IdentityConfig {
                url: None,
                service_key: None,
                anon_key: None,
                jwt_secret: None,
                request_timeout: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.carefulliq.com".to_string()],
            },
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.security.enable_cors);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::preset(Environment::Production);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.identity.request_timeout, 10);
    }

    #[test]
    fn overrides_replace_preset_values() {
        let config = AppConfig::development().with_overrides(lookup(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/carefull"),
            ("IDENTITY_URL", "https://auth.example.com/"),
            ("IDENTITY_JWT_SECRET", "   "),
            ("SECURITY_CORS_ORIGINS", "https://a.example.com, https://b.example.com,"),
        ]));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/carefull"));
        assert_eq!(config.identity.url.as_deref(), Some("https://auth.example.com"));
        assert_eq!(config.identity.jwt_secret, None);
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example.com".to_string(), "https://b.example.com".to_string()]
        );
    }

    #[test]
    fn carefull_port_wins_over_port() {
        let config = AppConfig::development()
            .with_overrides(lookup(&[("CAREFULL_PORT", "4000"), ("PORT", "5000")]));
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn unparseable_values_keep_preset() {
        let config = AppConfig::development()
            .with_overrides(lookup(&[("DATABASE_MAX_CONNECTIONS", "many"), ("SECURITY_ENABLE_CORS", "yes")]));
        assert_eq!(config.database.max_connections, 10);
        assert!(config.security.enable_cors);
    }
}
