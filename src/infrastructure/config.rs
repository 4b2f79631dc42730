use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub grafana: GrafanaSettings,
    pub redis: RedisSettings,
    pub graphite: GraphiteSettings,
    pub http: HttpSettings,
    pub log: LogSettings,
    #[serde(default)]
    pub status: StatusSettings,
    pub check_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrafanaSettings {
    pub endpoint: String,
    pub access_token: String,
    pub alert_tag: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub queue: String,
    /// Bounds both connecting and every reply.
    pub timeout_secs: u64,
}

impl RedisSettings {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphiteSettings {
    pub from: String,
    pub until: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub file: Option<String>,
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StatusSettings {
    pub listen: Option<String>,
}

/// Prefix of environment overrides, e.g. `RECEIVER__REDIS__HOST`.
const ENV_PREFIX: &str = "RECEIVER";

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("grafana.endpoint", "http://localhost:3000/")?
        .set_default("grafana.access_token", "")?
        .set_default("grafana.alert_tag", "alert")?
        .set_default("redis.host", "localhost")?
        .set_default("redis.port", 6379)?
        .set_default("redis.queue", "events")?
        .set_default("redis.timeout_secs", 10)?
        .set_default("graphite.from", "-1h")?
        .set_default("http.timeout_secs", 30)?
        .set_default("log.level", "info")?
        .set_default("check_interval_secs", 300)
}

/// Loads `path` on top of the built-in defaults, then `config/local` and
/// finally `RECEIVER__*` environment variables. Both files are optional.
pub fn load_config(path: &str) -> anyhow::Result<AppConfig> {
    let settings = defaults()?
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::File::with_name("config/local").required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    finish(settings.try_deserialize()?)
}

fn finish(mut config: AppConfig) -> anyhow::Result<AppConfig> {
    if config.grafana.endpoint.trim().is_empty() {
        anyhow::bail!("grafana.endpoint must not be empty");
    }
    if config.redis.timeout_secs == 0 {
        anyhow::bail!("redis.timeout_secs must be at least 1");
    }
    if config.check_interval_secs == 0 {
        anyhow::bail!("check_interval_secs must be at least 1");
    }
    if !config.grafana.endpoint.ends_with('/') {
        config.grafana.endpoint.push('/');
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> anyhow::Result<AppConfig> {
        let settings = defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        finish(settings.try_deserialize()?)
    }

    #[test]
    fn test_defaults() {
        let config = parse("").unwrap();

        assert_eq!(config.grafana.alert_tag, "alert");
        assert_eq!(config.redis.url(), "redis://localhost:6379/");
        assert_eq!(config.redis.queue, "events");
        assert_eq!(config.redis.timeout_secs, 10);
        assert_eq!(config.graphite.from, "-1h");
        assert_eq!(config.graphite.until, None);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.log.file, None);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.status.listen, None);
        assert_eq!(config.check_interval_secs, 300);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = parse(
            r#"
            check_interval_secs = 60

            [grafana]
            endpoint = "https://grafana.example.com"
            access_token = "secret"

            [redis]
            host = "flapjack-redis"
            port = 6380

            [log]
            file = "/var/log/receiver.log"
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.grafana.endpoint, "https://grafana.example.com/");
        assert_eq!(config.grafana.access_token, "secret");
        assert_eq!(config.redis.url(), "redis://flapjack-redis:6380/");
        assert_eq!(config.log.file.as_deref(), Some("/var/log/receiver.log"));
        assert_eq!(config.check_interval_secs, 60);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(parse("check_interval_secs = 0").is_err());
    }

    #[test]
    fn test_zero_redis_timeout_is_rejected() {
        assert!(parse("[redis]\ntimeout_secs = 0").is_err());
    }
}
