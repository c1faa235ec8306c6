use serde::Deserialize;
use url::Url;

use crate::status::EngineSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    #[serde(default)]
    pub queues: QueuesConfig,
    #[serde(default)]
    pub capacity: CapacitySourceConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Address of the live status JSON.
    pub status_url: String,
    /// Server that relative job links are resolved against.
    pub base_server_url: String,
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,
    /// Timeout for every other remote document (capacity config).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_status_timeout_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueuesConfig {
    /// Registry of known queues; "all" and the history chart use this order.
    #[serde(default = "default_known_queues")]
    pub known: Vec<String>,
    /// Queue shown when a request names none.
    #[serde(default = "default_queue")]
    pub default: String,
    /// Queue whose ETC is modelled as FIFO drain through the worker pool.
    #[serde(default)]
    pub rate_based: Option<String>,
    #[serde(default = "default_job_duration_hours")]
    pub job_duration_hours: f64,
    #[serde(default = "default_platform_labels")]
    pub platform_labels: Vec<String>,
}

impl Default for QueuesConfig {
    fn default() -> Self {
        Self {
            known: default_known_queues(),
            default: default_queue(),
            rate_based: None,
            job_duration_hours: default_job_duration_hours(),
            platform_labels: default_platform_labels(),
        }
    }
}

fn default_known_queues() -> Vec<String> {
    vec!["check".into(), "gate".into(), "post".into()]
}

fn default_queue() -> String {
    "check".into()
}

fn default_job_duration_hours() -> f64 {
    2.0
}

fn default_platform_labels() -> Vec<String> {
    vec!["centos-7-".into()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapacitySourceConfig {
    /// YAML document listing providers and their `max-servers`. Unset = use `default_max`.
    #[serde(default)]
    pub config_url: Option<String>,
    #[serde(default)]
    pub default_max: Option<u32>,
    #[serde(default = "default_capacity_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for CapacitySourceConfig {
    fn default() -> Self {
        Self {
            config_url: None,
            default_max: None,
            refresh_secs: default_capacity_refresh_secs(),
        }
    }
}

fn default_capacity_refresh_secs() -> u64 {
    30 * 60
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Max samples kept; oldest evicted first.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
    /// At most one sample per window.
    #[serde(default = "default_throttle_secs")]
    pub throttle_secs: u64,
    /// How many registry queues (from the front) are sampled.
    #[serde(default = "default_sampled_queues")]
    pub sampled_queues: usize,
    /// Background sampler tick; the throttle still applies.
    #[serde(default = "default_worker_interval_secs")]
    pub worker_interval_secs: u64,
    /// How often the worker logs sampler stats at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
            throttle_secs: default_throttle_secs(),
            sampled_queues: default_sampled_queues(),
            worker_interval_secs: default_worker_interval_secs(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

fn default_history_capacity() -> usize {
    // One day at one sample per 4 minutes.
    360
}

fn default_throttle_secs() -> u64 {
    4 * 60
}

fn default_sampled_queues() -> usize {
    3
}

fn default_worker_interval_secs() -> u64 {
    60
}

fn default_stats_log_interval_secs() -> u64 {
    3600
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Engine settings derived from `[feed]` and `[queues]`.
    pub fn engine_settings(&self) -> anyhow::Result<EngineSettings> {
        Ok(EngineSettings {
            known_queues: self.queues.known.clone(),
            rate_based_queue: self.queues.rate_based.clone(),
            job_duration_hours: self.queues.job_duration_hours,
            base_server_url: Url::parse(&self.feed.base_server_url)?,
            platform_labels: self.queues.platform_labels.clone(),
        })
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            Url::parse(&self.feed.status_url).is_ok(),
            "feed.status_url must be an absolute URL, got {:?}",
            self.feed.status_url
        );
        anyhow::ensure!(
            Url::parse(&self.feed.base_server_url).is_ok(),
            "feed.base_server_url must be an absolute URL, got {:?}",
            self.feed.base_server_url
        );
        anyhow::ensure!(
            self.feed.status_timeout_secs > 0,
            "feed.status_timeout_secs must be > 0, got {}",
            self.feed.status_timeout_secs
        );
        anyhow::ensure!(
            self.feed.timeout_secs > 0,
            "feed.timeout_secs must be > 0, got {}",
            self.feed.timeout_secs
        );
        anyhow::ensure!(
            !self.queues.known.is_empty(),
            "queues.known must list at least one queue"
        );
        anyhow::ensure!(
            !self.queues.default.is_empty(),
            "queues.default must be non-empty"
        );
        anyhow::ensure!(
            self.queues.job_duration_hours > 0.0,
            "queues.job_duration_hours must be > 0, got {}",
            self.queues.job_duration_hours
        );
        if let Some(url) = &self.capacity.config_url {
            anyhow::ensure!(
                Url::parse(url).is_ok(),
                "capacity.config_url must be an absolute URL, got {:?}",
                url
            );
        }
        anyhow::ensure!(
            self.capacity.refresh_secs > 0,
            "capacity.refresh_secs must be > 0, got {}",
            self.capacity.refresh_secs
        );
        anyhow::ensure!(
            self.history.capacity > 0,
            "history.capacity must be > 0, got {}",
            self.history.capacity
        );
        anyhow::ensure!(
            self.history.throttle_secs > 0,
            "history.throttle_secs must be > 0, got {}",
            self.history.throttle_secs
        );
        anyhow::ensure!(
            self.history.worker_interval_secs > 0,
            "history.worker_interval_secs must be > 0, got {}",
            self.history.worker_interval_secs
        );
        anyhow::ensure!(
            self.history.stats_log_interval_secs > 0,
            "history.stats_log_interval_secs must be > 0, got {}",
            self.history.stats_log_interval_secs
        );
        Ok(())
    }
}
