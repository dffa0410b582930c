use std::path::PathBuf;

use crate::auth::{JwtConfig, jwt::generate_printable_secret};
use crate::core::ServerError;
use crate::payment::CheckoutUrls;

/// Placeholder webhook secret accepted in development only
const DEV_WEBHOOK_SECRET: &str = "whsec_development";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | database and logs |
/// | HTTP_PORT | 5000 | listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | base log level (`RUST_LOG` wins) |
/// | LOG_JSON | false | JSON console logs |
/// | LOG_DIR | unset | enable rolling file logs |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
/// | JWT_SECRET | generated in development | HS256 key |
/// | JWT_ISSUER / JWT_AUDIENCE / JWT_EXPIRATION_MINUTES | market-server / market-clients / 1440 | token validation |
/// | STRIPE_SECRET_KEY | unset | enables the payment gateway |
/// | STRIPE_WEBHOOK_SECRET | placeholder in development | webhook signing secret |
/// | CHECKOUT_SUCCESS_URL / CHECKOUT_CANCEL_URL | localhost:3000 pages | checkout redirects |
/// | CURRENCY | usd | checkout currency |
///
/// ```ignore
/// WORK_DIR=/srv/market HTTP_PORT=8080 cargo run -p market-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub request_timeout_ms: u64,
    pub jwt: JwtConfig,
    /// None runs the server without a payment gateway
    pub stripe: Option<StripeConfig>,
    pub checkout: CheckoutUrls,
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub currency: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from the process environment (after `.env`)
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = env_or("ENVIRONMENT", "development");
        let development = environment == "development";

        let secret = match std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if development => {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                generate_printable_secret()?
            }
            None => {
                return Err(ServerError::Config(
                    "JWT_SECRET must be set outside development".to_string(),
                ));
            }
        };

        let stripe = match std::env::var("STRIPE_SECRET_KEY").ok().filter(|s| !s.is_empty()) {
            Some(secret_key) => {
                let webhook_secret = match std::env::var("STRIPE_WEBHOOK_SECRET")
                    .ok()
                    .filter(|s| !s.is_empty())
                {
                    Some(secret) => secret,
                    None if development => DEV_WEBHOOK_SECRET.to_string(),
                    None => {
                        return Err(ServerError::Config(
                            "STRIPE_WEBHOOK_SECRET must be set when STRIPE_SECRET_KEY is".to_string(),
                        ));
                    }
                };
                Some(StripeConfig {
                    secret_key,
                    webhook_secret,
                    currency: env_or("CURRENCY", "usd").to_lowercase(),
                })
            }
            None => None,
        };

        Ok(Self {
            work_dir: env_or("WORK_DIR", "./data"),
            http_port: env_parse("HTTP_PORT", 5000),
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000),
            jwt: JwtConfig {
                secret,
                expiration_minutes: env_parse("JWT_EXPIRATION_MINUTES", 1440),
                issuer: env_or("JWT_ISSUER", "market-server"),
                audience: env_or("JWT_AUDIENCE", "market-clients"),
            },
            stripe,
            checkout: CheckoutUrls {
                success_url: env_or(
                    "CHECKOUT_SUCCESS_URL",
                    "http://localhost:3000/orders/success",
                ),
                cancel_url: env_or("CHECKOUT_CANCEL_URL", "http://localhost:3000/orders/cancel"),
            },
            environment,
        })
    }

    /// Fixed configuration for tests and embedded use
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            work_dir: "./data".to_string(),
            http_port: 0,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
            request_timeout_ms: 30_000,
            jwt: JwtConfig {
                secret: jwt_secret.into(),
                expiration_minutes: 60,
                issuer: "market-server".to_string(),
                audience: "market-clients".to_string(),
            },
            stripe: None,
            checkout: CheckoutUrls {
                success_url: "http://localhost:3000/orders/success".to_string(),
                cancel_url: "http://localhost:3000/orders/cancel".to_string(),
            },
        }
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(crate::db::DB_FILE_NAME)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path_inside_work_dir() {
        let mut config = Config::for_tests("x".repeat(40));
        config.work_dir = "/srv/market".to_string();
        assert_eq!(config.db_path(), PathBuf::from("/srv/market/market.redb"));
        assert!(config.is_development());
        assert!(!config.is_production());
    }

    #[test]
    fn test_env_parse_falls_back() {
        assert_eq!(env_parse("MARKET_TEST_UNSET_VAR", 7u16), 7);
        assert_eq!(env_or("MARKET_TEST_UNSET_VAR", "fallback"), "fallback");
    }
}
