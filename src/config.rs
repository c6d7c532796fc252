use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub ingestion: IngestionConfig,
    pub aggregation: AggregationConfig,
    pub tracks: TracksConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    /// OMF endpoint URL, e.g. "https://relay.example.com:5460/ingress/messages".
    pub endpoint: String,
    pub producer_token: String,
    #[serde(default)]
    pub compression_gzip: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Window granularity: counts are bucketed into windows of this length.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// How often the scheduler checks whether a window has closed.
    pub flush_interval_ms: u64,
}

fn default_window_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracksConfig {
    /// Keywords to track; ids are assigned 1..N in this order.
    pub keywords: Vec<String>,
    /// Display name of the provider asset in the hierarchy.
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
}

fn default_provider_name() -> String {
    "Keywatch".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Bounded capacity of the match-event channel (back-pressure limit).
    pub queue_capacity: usize,
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

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.ingestion.endpoint.is_empty(),
            "ingestion.endpoint must be non-empty"
        );
        anyhow::ensure!(
            !self.ingestion.producer_token.is_empty(),
            "ingestion.producer_token must be non-empty"
        );
        anyhow::ensure!(
            self.ingestion.request_timeout_secs > 0,
            "ingestion.request_timeout_secs must be > 0, got {}",
            self.ingestion.request_timeout_secs
        );
        anyhow::ensure!(
            self.aggregation.window_secs > 0,
            "aggregation.window_secs must be > 0, got {}",
            self.aggregation.window_secs
        );
        anyhow::ensure!(
            self.aggregation.flush_interval_ms > 0,
            "aggregation.flush_interval_ms must be > 0, got {}",
            self.aggregation.flush_interval_ms
        );
        anyhow::ensure!(
            !self.tracks.keywords.is_empty(),
            "tracks.keywords must list at least one keyword"
        );
        anyhow::ensure!(
            self.tracks.keywords.iter().all(|k| !k.trim().is_empty()),
            "tracks.keywords must not contain empty entries"
        );
        for (i, a) in self.tracks.keywords.iter().enumerate() {
            anyhow::ensure!(
                !self.tracks.keywords[i + 1..].contains(a),
                "tracks.keywords contains duplicate entry {:?}",
                a
            );
        }
        anyhow::ensure!(
            !self.tracks.provider_name.is_empty(),
            "tracks.provider_name must be non-empty"
        );
        anyhow::ensure!(
            self.events.queue_capacity > 0,
            "events.queue_capacity must be > 0, got {}",
            self.events.queue_capacity
        );
        Ok(())
    }
}
