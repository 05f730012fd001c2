//! Service configuration.

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the SQLite database file (default: "/data/storefront.db").
    pub database_path: String,

    /// Shared secret used to validate bearer JWTs.
    pub auth_secret: String,

    /// Expected JWT issuer.
    pub auth_issuer: String,

    /// Expected JWT audience (default: "storefront").
    pub auth_audience: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Default page size for product listings.
    pub default_page_size: i64,

    /// Upper bound a caller may request via `page_size`.
    pub max_page_size: i64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "/data/storefront.db".into()),
            auth_secret: std::env::var("AUTH_SECRET").unwrap_or_else(|_| {
                tracing::warn!("AUTH_SECRET not set - using an insecure development secret");
                "insecure-dev-secret".into()
            }),
            auth_issuer: std::env::var("AUTH_ISSUER")
                .unwrap_or_else(|_| "https://auth.localhost".into()),
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "storefront".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            default_page_size: std::env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            max_page_size: std::env::var("MAX_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_path: "/data/storefront.db".into(),
            auth_secret: "insecure-dev-secret".into(),
            auth_issuer: "https://auth.localhost".into(),
            auth_audience: "storefront".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
