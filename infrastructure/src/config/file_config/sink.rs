//! Sink configuration from TOML (`[sink]` section)

use crate::sink::ElasticsearchConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Elasticsearch connection and index settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
    pub host: String,
    pub port: u16,
    pub use_ssl: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub index_name: String,
    pub shards: u32,
    pub replicas: u32,
    pub max_result_window: u32,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9200,
            use_ssl: false,
            username: None,
            password: None,
            timeout_secs: 30,
            index_name: "copilot-chat-logs".to_string(),
            shards: 1,
            replicas: 0,
            max_result_window: 10000,
        }
    }
}

impl FileSinkConfig {
    pub fn to_elasticsearch_config(&self) -> ElasticsearchConfig {
        ElasticsearchConfig {
            host: self.host.clone(),
            port: self.port,
            use_ssl: self.use_ssl,
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            index_name: self.index_name.clone(),
            shards: self.shards,
            replicas: self.replicas,
            max_result_window: self.max_result_window,
        }
    }
}
