use serde::Deserialize;

/// Root CRM configuration. Loaded from environment variables with the
/// prefix `CRM__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrmConfig {
    #[serde(default)]
    pub segmentation: SegmentationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentationConfig {
    /// Location of the serialized segment catalog.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    /// Look-back window in days for the recency-based quick segments.
    #[serde(default = "default_quick_window_days")]
    pub quick_window_days: i64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            quick_window_days: default_quick_window_days(),
        }
    }
}

fn default_catalog_path() -> String {
    "data/crm-segments.json".to_string()
}

fn default_quick_window_days() -> i64 {
    30
}

impl CrmConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CRM")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
