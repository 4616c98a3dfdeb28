use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub max_name_len: usize,
    pub max_description_len: usize,
    pub data_file: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_name_len", &self.max_name_len)
            .field("max_description_len", &self.max_description_len)
            .field("data_file", &self.data_file.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env_or("PORT", 3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            max_name_len: env_or("MAX_NAME_LEN", 100),
            max_description_len: env_or("MAX_DESCRIPTION_LEN", 255),
            data_file: env::var("DATA_FILE").ok().filter(|p| !p.trim().is_empty()),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
