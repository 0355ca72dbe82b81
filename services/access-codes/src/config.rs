/// Access-code service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AccessCodesConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3180). Env var: `ACCESS_CODES_PORT`.
    pub port: u16,
}

impl AccessCodesConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            port: std::env::var("ACCESS_CODES_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3180),
        }
    }
}
