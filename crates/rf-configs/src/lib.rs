//! # rf-configs
//!
//! Layered runtime configuration. Sources, lowest precedence first:
//! built-in defaults, `config/default.toml`, `config/local.toml`, then
//! `FORUM__SECTION__KEY` environment variables (after loading any `.env`).
//!
//! `auth.access_token_key` has no default and must come from one of the
//! sources, typically `FORUM__AUTH__ACCESS_TOKEN_KEY`.

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// May embed credentials, hence kept secret.
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    /// HS256 key the access tokens are signed with. Has no default.
    pub access_token_key: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Loads `.env` (if any), the config files under `config/` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let builder = defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("FORUM").prefix_separator("__").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Defaults overlaid with a TOML document; used by tooling and tests.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let builder = defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Ok(builder.build()?.try_deserialize()?)
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "sqlite:rusty_forum.db")?
        .set_default("database.max_connections", 5)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const AUTH: &str = "auth.access_token_key = \"s3cr3t-key\"\n";

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_toml(AUTH).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.url.expose_secret(), "sqlite:rusty_forum.db");
        assert_eq!(settings.database.max_connections, 5);
        assert!(!settings.log.json);
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml(
            r#"
            [server]
            port = 3000

            [auth]
            access_token_key = "rahasia"

            [database]
            url = "sqlite::memory:"

            [log]
            level = "debug,sqlx=warn"
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.database.url.expose_secret(), "sqlite::memory:");
        assert_eq!(settings.log.level, "debug,sqlx=warn");
        assert_eq!(settings.auth.access_token_key.expose_secret(), "rahasia");
        assert!(settings.log.json);
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let toml = format!("{AUTH}database.url = \"sqlite://user:pw@host/db\"");
        let rendered = format!("{:?}", Settings::from_toml(&toml).unwrap());
        assert!(!rendered.contains("pw@host"));
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn mistyped_port_is_an_error() {
        let toml = format!("{AUTH}server.port = \"eighty\"");
        assert!(Settings::from_toml(&toml).is_err());
    }

    #[test]
    fn missing_access_token_key_is_an_error() {
        assert!(Settings::from_toml("").is_err());
    }
}
