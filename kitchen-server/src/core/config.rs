use crate::auth::JwtConfig;
use crate::core::ServerError;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATABASE_URL | sqlite:kitchen.db | SQLite database |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | generated in development | token signing secret, >= 32 chars |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | JWT_ISSUER / JWT_AUDIENCE | kitchen-server / kitchen-dashboard | token claims |
/// | ADMIN_EMAIL / ADMIN_PASSWORD / ADMIN_NAME | - | bootstrap admin for an empty users table |
/// | STATIC_DIR | - | built dashboard to serve for non-API paths |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
/// | LOGIN_DELAY_MS | 300 | fixed login response delay |
/// | LOG_LEVEL | info | default filter when RUST_LOG is unset |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | - | daily rolling log files |
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/kitchen.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
    pub static_dir: Option<String>,
    pub request_timeout_ms: u64,
    /// Fixed delay applied to every login attempt
    pub login_delay_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt =
            JwtConfig::from_env(&environment).map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:kitchen.db".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            jwt,
            admin_email: env_opt("ADMIN_EMAIL"),
            admin_password: env_opt("ADMIN_PASSWORD"),
            admin_name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
            static_dir: env_opt("STATIC_DIR"),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000),
            login_delay_ms: env_parse("LOGIN_DELAY_MS", 300),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: env_opt("LOG_DIR"),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
