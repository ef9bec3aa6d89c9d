use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Paths starting with this prefix get `Access-Control-Allow-Origin: *`.
    /// None of the trivia routes live under it (see DESIGN.md).
    pub cors_path_prefix: String,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

/// Loads settings from defaults, an optional `configuration.*` file in the
/// working directory and `APP_`-prefixed environment variables
/// (`APP_APPLICATION__PORT=9000`). `DATABASE_URL` wins over everything else.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();

    Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080)?
        .set_default("application.cors_path_prefix", "/api")?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)?
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("database.url", dotenv::var("DATABASE_URL").ok())?
        .build()?
        .try_deserialize()
}
