use crate::app::AppError;

#[derive(Debug, Clone)]
pub struct StationConfig {
    pub http_bind: String,
    pub db_path: String,
}

impl StationConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            http_bind: string_or_default(&lookup, "STATION_HTTP_BIND", "0.0.0.0:8000"),
            db_path: string_or_default(&lookup, "STATION_DB_PATH", "./data/stations.db"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct DemandConfig {
    pub http_bind: String,
}

impl DemandConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            http_bind: string_or_default(&lookup, "DEMAND_HTTP_BIND", "0.0.0.0:8001"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub http_bind: String,
    pub demand_url: String,
    pub demand_timeout_ms: u64,
}

impl PricingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            http_bind: string_or_default(&lookup, "PRICING_HTTP_BIND", "0.0.0.0:8002"),
            demand_url: string_or_default(
                &lookup,
                "DEMAND_SERVICE_URL",
                "http://demand-service:8001/predict/demand",
            ),
            demand_timeout_ms: parse_or_default(&lookup, "DEMAND_REQUEST_TIMEOUT_MS", 3000_u64)?,
        })
    }
}

fn string_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{DemandConfig, PricingConfig, StationConfig};

    #[test]
    fn station_config_applies_defaults() {
        let config = StationConfig::from_lookup(|_| None).expect("config should be valid");

        assert_eq!(config.http_bind, "0.0.0.0:8000");
        assert_eq!(config.db_path, "./data/stations.db");
    }

    #[test]
    fn station_config_honors_overrides() {
        let config = StationConfig::from_lookup(|key| match key {
            "STATION_HTTP_BIND" => Some("127.0.0.1:9000".to_string()),
            "STATION_DB_PATH" => Some("/tmp/stations.db".to_string()),
            _ => None,
        })
        .expect("config should be valid");

        assert_eq!(config.http_bind, "127.0.0.1:9000");
        assert_eq!(config.db_path, "/tmp/stations.db");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = StationConfig::from_lookup(|key| match key {
            "STATION_DB_PATH" => Some("   ".to_string()),
            _ => None,
        })
        .expect("config should be valid");

        assert_eq!(config.db_path, "./data/stations.db");
    }

    #[test]
    fn demand_config_applies_defaults() {
        let config = DemandConfig::from_lookup(|_| None).expect("config should be valid");

        assert_eq!(config.http_bind, "0.0.0.0:8001");
    }

    #[test]
    fn pricing_config_applies_defaults() {
        let config = PricingConfig::from_lookup(|_| None).expect("config should be valid");

        assert_eq!(config.http_bind, "0.0.0.0:8002");
        assert_eq!(
            config.demand_url,
            "http://demand-service:8001/predict/demand"
        );
        assert_eq!(config.demand_timeout_ms, 3000);
    }

    #[test]
    fn pricing_config_rejects_invalid_timeout() {
        let result = PricingConfig::from_lookup(|key| match key {
            "DEMAND_REQUEST_TIMEOUT_MS" => Some("abc".to_string()),
            _ => None,
        });

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: DEMAND_REQUEST_TIMEOUT_MS must be a valid number"
        );
    }
}
