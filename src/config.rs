use std::collections::HashMap;
use thiserror::Error;

/// Runtime configuration. All collaborator endpoints and platform knobs are
/// injected here; there is no ambient global state.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Optional fire-and-forget notification webhook.
    pub notify_webhook_url: Option<String>,
    /// Deposit wallet address per asset symbol (e.g. "ethereum" -> "0x..").
    pub deposit_wallets: HashMap<String, String>,
    pub min_deposit: f64,
    pub min_withdrawal: f64,
    pub referral_bonus: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let notify_webhook_url = env_map
            .get("NOTIFY_WEBHOOK_URL")
            .cloned()
            .filter(|s| !s.trim().is_empty());

        let deposit_wallets = parse_deposit_wallets(&env_map)?;

        let min_deposit = parse_amount(&env_map, "MIN_DEPOSIT", "50")?;
        let min_withdrawal = parse_amount(&env_map, "MIN_WITHDRAWAL", "500")?;
        let referral_bonus = parse_amount(&env_map, "REFERRAL_BONUS", "50")?;

        Ok(Config {
            port,
            database_path,
            notify_webhook_url,
            deposit_wallets,
            min_deposit,
            min_withdrawal,
            referral_bonus,
        })
    }
}

/// Parse `DEPOSIT_WALLETS` of the form `asset=address,asset=address`.
fn parse_deposit_wallets(
    env_map: &HashMap<String, String>,
) -> Result<HashMap<String, String>, ConfigError> {
    let Some(raw) = env_map.get("DEPOSIT_WALLETS") else {
        return Ok(HashMap::new());
    };

    let mut wallets = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((asset, address)) = entry.split_once('=') else {
            return Err(ConfigError::InvalidValue(
                "DEPOSIT_WALLETS".to_string(),
                format!("expected asset=address, got {}", entry),
            ));
        };
        wallets.insert(
            asset.trim().to_lowercase(),
            address.trim().to_string(),
        );
    }
    Ok(wallets)
}

fn parse_amount(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<f64, ConfigError> {
    let value = env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .parse::<f64>()
        .map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid number".to_string())
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be a non-negative finite number".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.min_deposit, 50.0);
        assert_eq!(config.min_withdrawal, 500.0);
        assert_eq!(config.referral_bonus, 50.0);
        assert!(config.notify_webhook_url.is_none());
        assert!(config.deposit_wallets.is_empty());
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        match Config::from_env_map(env_map) {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_parse_deposit_wallets() {
        let mut env_map = setup_required_env();
        env_map.insert(
            "DEPOSIT_WALLETS".to_string(),
            "ethereum=0xabc, bitcoin=bc1xyz".to_string(),
        );
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.deposit_wallets["ethereum"], "0xabc");
        assert_eq!(config.deposit_wallets["bitcoin"], "bc1xyz");
    }

    #[test]
    fn test_malformed_deposit_wallets() {
        let mut env_map = setup_required_env();
        env_map.insert("DEPOSIT_WALLETS".to_string(), "ethereum".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DEPOSIT_WALLETS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_negative_min_deposit_rejected() {
        let mut env_map = setup_required_env();
        env_map.insert("MIN_DEPOSIT".to_string(), "-5".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MIN_DEPOSIT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
