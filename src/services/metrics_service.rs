use std::collections::HashMap;
use statsd::Client;
use std::sync::Arc;

use crate::config::StatsdConfig;

/// StatsD sink. A disabled service silently drops every metric.
#[derive(Clone, Default)]
pub struct MetricsService {
    client: Option<Arc<Client>>,
}

impl MetricsService {
    pub fn new(config: &StatsdConfig) -> anyhow::Result<Self> {
        let client = Client::new(format!("{}:{}", config.host, config.port), &config.prefix)
            .map_err(|e| anyhow::anyhow!("failed to create statsd client: {:?}", e))?;
        Ok(Self {
            client: Some(Arc::new(client)),
        })
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn increment(&self, metric: &str, tags: Option<&HashMap<String, String>>) {
        if let Some(client) = &self.client {
            client.incr(&tagged_name(metric, tags));
        }
    }

    pub fn timing(&self, metric: &str, duration: std::time::Duration, tags: Option<&HashMap<String, String>>) {
        if let Some(client) = &self.client {
            client.timer(&tagged_name(metric, tags), duration.as_millis() as f64);
        }
    }
}

fn tagged_name(metric: &str, tags: Option<&HashMap<String, String>>) -> String {
    match tags {
        Some(tags) if !tags.is_empty() => {
            let mut pairs = tags
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<String>>();
            pairs.sort();
            format!("{}#{}", metric, pairs.join(","))
        }
        _ => metric.to_string(),
    }
}
