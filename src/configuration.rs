use config::{Config, ConfigError};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::net::SocketAddr;
use tracing::info;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub postgres: PostgresSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub jwt_secret: Secret<String>,
    pub origin: String,
}

impl ApplicationSettings {
    pub fn get_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse::<SocketAddr>()
    }

    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: "0.0.0.0".into(),
            port: get_env("PORT")?
                .parse::<u16>()
                .map_err(|e| ConfigError::Message(format!("Invalid port number: {e}")))?,
            jwt_secret: Secret::new(get_env("JWT_SECRET")?),
            origin: get_env("WEBSITE_URL")?,
        })
    }
}

#[derive(Deserialize, Clone)]
pub struct DatabaseFields {
    username: String,
    password: Secret<String>,
    port: u16,
    host: String,
    database_name: String,
}

impl DatabaseFields {
    fn compose(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database_name
        )
    }
}

#[derive(Deserialize, Clone)]
pub struct PostgresSettings {
    database_url: Option<String>,
    fields: Option<DatabaseFields>,
    is_migrating: Option<bool>,
}

impl PostgresSettings {
    pub fn is_migrating(&self) -> bool {
        self.is_migrating.unwrap_or(false)
    }

    /// Composed fields win over an explicit url, which wins over `DATABASE_URL`.
    pub fn get_connection_string(&self) -> Result<String, ConfigError> {
        if let Some(fields) = &self.fields {
            info!("Using composed postgres url");
            return Ok(fields.compose());
        }
        if let Some(url) = &self.database_url {
            info!("Using field postgres url");
            return Ok(url.clone());
        }
        let url = get_env("DATABASE_URL")?;
        info!("Using env postgres url");
        Ok(url)
    }

    fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            fields: None,
            is_migrating: Some(true),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Environment {
    Local,
    Production,
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not supported environment. Use either `local` or `production`"
            )),
        }
    }
}

pub fn get_config() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {e}")))?;
    let config_dir = base_path.join("configuration");

    let environment = match std::env::var("APP_ENVIRONMENT") {
        Ok(env) => Environment::try_from(env).map_err(ConfigError::Message)?,
        Err(_) => Environment::Local,
    };

    match environment {
        Environment::Local => Config::builder()
            .add_source(config::File::from(config_dir.join("settings.toml")))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize(),
        Environment::Production => Ok(Settings {
            app: ApplicationSettings::from_env()?,
            postgres: PostgresSettings::from_env(),
        }),
    }
}

fn get_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::NotFound(name.to_string()))
}
