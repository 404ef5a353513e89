use anyhow::{Context, Result};
use platform_db::DatabaseSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub service_name: String,
    pub database: DatabaseSettings,
    pub seed_on_start: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let service_name = lookup("SERVICE_NAME").unwrap_or_else(|| "hr-server".into());

        let mut database = DatabaseSettings::default();
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            let max = raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS {raw:?}"))?;
            database = database.with_max_connections(max);
        }

        let seed_on_start = lookup("SEED_ON_START")
            .map(|val| env_bool(&val))
            .unwrap_or(false);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            service_name,
            database,
            seed_on_start,
            cors_allowed_origins,
        })
    }
}

fn env_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.service_name, "hr-server");
        assert!(!config.seed_on_start);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("SEED_ON_START", "Yes"),
            ("CORS_ALLOWED_ORIGINS", "https://a.test, ,https://b.test"),
            ("DATABASE_MAX_CONNECTIONS", "8"),
        ])
        .unwrap();
        assert!(config.seed_on_start);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.test", "https://b.test"]
        );
    }

    #[test]
    fn rejects_bad_pool_size() {
        assert!(load(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
    }
}
