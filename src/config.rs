use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

use crate::auth::DEFAULT_IDENTITY_HEADER;

const DEFAULT_REST_PORT: u16 = 8000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_dsn: String,
    #[serde(default = "default_rest_port")]
    pub rest_port: u16,
    /// Request header carrying the caller's email.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

const fn default_rest_port() -> u16 {
    DEFAULT_REST_PORT
}

fn default_identity_header() -> String {
    DEFAULT_IDENTITY_HEADER.to_string()
}

fn load_from_lookup<F>(lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    let database_dsn =
        lookup("PG_DSN").ok_or("PG_DSN environment variable is required")?;

    let rest_port = match lookup("REST_PORT") {
        Some(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse REST_PORT: {e}"))?,
        None => DEFAULT_REST_PORT,
    };

    let identity_header =
        lookup("IDENTITY_HEADER").unwrap_or_else(default_identity_header);

    Ok(Config {
        database_dsn,
        rest_port,
        identity_header,
    })
}

fn load_from_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_SERVER_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return load_from_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    match load_from_lookup(|key| env::var(key).ok()) {
        Ok(config) => {
            tracing::info!("Successfully loaded configuration from environment variables");
            Ok(config)
        }
        Err(e) => Err(format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("database_dsn: postgres://db/notes\n").unwrap();

        assert_eq!(config.database_dsn, "postgres://db/notes");
        assert_eq!(config.rest_port, DEFAULT_REST_PORT);
        assert_eq!(config.identity_header, DEFAULT_IDENTITY_HEADER);
    }

    #[test]
    fn yaml_overrides() {
        let config: Config = serde_yaml::from_str(
            "database_dsn: postgres://db/notes\nrest_port: 9000\nidentity_header: x-auth-email\n",
        )
        .unwrap();

        assert_eq!(config.rest_port, 9000);
        assert_eq!(config.identity_header, "x-auth-email");
    }

    #[test]
    fn env_requires_dsn() {
        assert!(load_from_lookup(lookup(&[])).is_err());

        let config = load_from_lookup(lookup(&[("PG_DSN", "postgres://db")])).unwrap();
        assert_eq!(config.rest_port, DEFAULT_REST_PORT);
        assert_eq!(config.identity_header, DEFAULT_IDENTITY_HEADER);
    }

    #[test]
    fn env_rejects_bad_port() {
        let result = load_from_lookup(lookup(&[("PG_DSN", "postgres://db"), ("REST_PORT", "http")]));
        assert!(result.is_err());

        let config =
            load_from_lookup(lookup(&[("PG_DSN", "postgres://db"), ("REST_PORT", "8080")])).unwrap();
        assert_eq!(config.rest_port, 8080);
    }
}
