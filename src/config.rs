use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub dealership_api_url: String,
    pub sentiment_api_url: String,
    pub listen_addr: SocketAddr,
    pub upstream_timeout: Duration,
    pub session_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        info!("loading configuration from environment...");

        Ok(Config {
            database_url: load("DATABASE_URL", "sqlite://dealership.db?mode=rwc"),
            dealership_api_url: load("DEALERSHIP_API_URL", "http://localhost:3030"),
            sentiment_api_url: load("SENTIMENT_API_URL", "http://localhost:5050"),
            listen_addr: parse("LISTEN_ADDR", "127.0.0.1:8000")?,
            upstream_timeout: Duration::from_secs(parse("UPSTREAM_TIMEOUT_SECS", "10")?),
            session_ttl: chrono::Duration::hours(parse("SESSION_TTL_HOURS", "336")?),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            dealership_api_url: "http://localhost:3030".to_string(),
            sentiment_api_url: "http://localhost:5050".to_string(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            upstream_timeout: Duration::from_secs(10),
            session_ttl: chrono::Duration::hours(336),
        }
    }
}

fn load(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        debug!("{} is not set, using default: {}", key, default);
        default.to_string()
    })
}

fn parse<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = load(key, default);
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{} has an invalid value {:?}: {}", key, raw, e))
}
