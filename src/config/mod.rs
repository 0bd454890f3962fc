use std::env;

/// Application configuration, built once at startup and threaded through
/// the state instead of reading environment variables at call sites.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JWT Secret Key (Required in production)
    pub jwt_secret: String,

    /// Email of the seed admin account. This identity can never be deleted
    /// or revoked.
    pub admin_email: String,

    /// Seed password for the admin account (dev fallback, override in
    /// production)
    pub admin_password: String,

    /// Category every new signup is subscribed to
    pub default_category: String,

    /// Base URL of the web client, used in password-reset links
    pub client_url: String,

    /// Password-reset token lifetime in minutes (default: 60)
    pub reset_token_ttl_minutes: i64,

    /// Mailer type: "smtp" or "noop" (default: "smtp")
    pub mailer_type: String,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP credentials
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,

    /// From address for outbound mail
    pub smtp_from: String,

    /// Maximum accepted CSV upload size in bytes (default: 5 MB)
    pub max_csv_size: usize,

    /// Allowed CORS Origins (comma separated, "*" for any)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "secret".to_string(),
            admin_email: "admin@streamhub.local".to_string(),
            admin_password: "admin123".to_string(),
            default_category: "Big Data Free".to_string(),
            client_url: "http://localhost:3000".to_string(),
            reset_token_ttl_minutes: 60,
            mailer_type: "smtp".to_string(),
            smtp_host: "127.0.0.1".to_string(),
            smtp_username: None,
            smtp_password: None,
            smtp_from: "Streamhub <no-reply@streamhub.local>".to_string(),
            max_csv_size: 5 * 1024 * 1024, // 5 MB
            // More secure default: localhost only instead of wildcard
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret), // Fallback for dev convenience

            admin_email: env::var("ADMIN_EMAIL").unwrap_or(default.admin_email),

            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(default.admin_password),

            default_category: env::var("DEFAULT_CATEGORY").unwrap_or(default.default_category),

            client_url: env::var("CLIENT_URL").unwrap_or(default.client_url),

            reset_token_ttl_minutes: env::var("RESET_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.reset_token_ttl_minutes),

            mailer_type: env::var("MAILER_TYPE").unwrap_or(default.mailer_type),

            smtp_host: env::var("SMTP_HOST").unwrap_or(default.smtp_host),

            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),

            smtp_from: env::var("SMTP_FROM").unwrap_or(default.smtp_from),

            max_csv_size: env::var("MAX_CSV_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_csv_size),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development and tests (no outbound email)
    pub fn development() -> Self {
        Self {
            mailer_type: "noop".to_string(),
            ..Self::default()
        }
    }
}
