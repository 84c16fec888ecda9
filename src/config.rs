use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use eyre::{Result, WrapErr};

pub const DEFAULT_BASE_URL: &str = "https://xueqiu.com";
pub const DEFAULT_COOKIE_FILE: &str = "xueqiu_cookie.txt";
pub const DEFAULT_COOKIE_DOMAIN: &str = "xueqiu.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub cookie_file: PathBuf,
    pub cookie_domain: String,
    pub request_timeout: Option<Duration>, // None means requests may block indefinitely
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let base_url = env::var("XUEQIU_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let cookie_file = env::var("XUEQIU_COOKIE_FILE").unwrap_or_else(|_| DEFAULT_COOKIE_FILE.to_string());
        let cookie_domain = env::var("XUEQIU_COOKIE_DOMAIN").unwrap_or_else(|_| DEFAULT_COOKIE_DOMAIN.to_string());

        let request_timeout = match env::var("XUEQIU_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .wrap_err_with(|| format!("Invalid XUEQIU_TIMEOUT_SECS value: {raw}"))?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Config {
            base_url,
            cookie_file: PathBuf::from(cookie_file),
            cookie_domain,
            request_timeout,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_file: PathBuf::from(DEFAULT_COOKIE_FILE),
            cookie_domain: DEFAULT_COOKIE_DOMAIN.to_string(),
            request_timeout: None,
        }
    }
}
