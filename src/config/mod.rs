use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Default starting balance used by the get-or-create flow when the
    // client does not supply one.
    pub default_initial_balance: rust_decimal::Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            default_initial_balance: env::var("DEFAULT_INITIAL_BALANCE")
                .unwrap_or_else(|_| "0".into())
                .parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations cannot race a parallel sibling.
    #[test]
    fn test_malformed_default_initial_balance_is_rejected() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/fxjournal");

        std::env::set_var("DEFAULT_INITIAL_BALANCE", "not-a-number");
        assert!(AppConfig::from_env().is_err());

        std::env::set_var("DEFAULT_INITIAL_BALANCE", "250.75");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.default_initial_balance, "250.75".parse().unwrap());

        std::env::remove_var("DEFAULT_INITIAL_BALANCE");
    }
}
