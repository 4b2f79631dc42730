// Redis list sink feeding Flapjack
use crate::application::repository::EventSink;
use crate::domain::event::Event;
use crate::infrastructure::config::RedisSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct RedisEventSink {
    client: redis::Client,
    queue: String,
    timeout: Duration,
}

impl RedisEventSink {
    /// Does not connect yet; a connection is opened on every push.
    pub fn new(settings: &RedisSettings) -> Result<Self> {
        let client = redis::Client::open(settings.url()).context("Invalid redis address")?;
        Ok(Self {
            client,
            queue: settings.queue.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

fn encode_events(events: &[Event]) -> Result<Vec<String>> {
    events
        .iter()
        .map(|e| serde_json::to_string(e).context("Failed to serialize event"))
        .collect()
}

#[async_trait]
impl EventSink for RedisEventSink {
    /// LPUSHes every event inside a single MULTI/EXEC. Both the connect and
    /// the reply are bounded by `redis.timeout_secs`.
    async fn push(&self, events: &[Event]) -> Result<()> {
        let payloads = encode_events(events)?;

        let config = redis::AsyncConnectionConfig::new()
            .set_connection_timeout(self.timeout)
            .set_response_timeout(self.timeout);
        let mut conn = self
            .client
            .get_multiplexed_async_connection_with_config(&config)
            .await
            .context("Failed to connect to redis")?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for payload in payloads {
            pipe.lpush(&self.queue, payload).ignore();
        }

        let _: () = pipe
            .query_async(&mut conn)
            .await
            .context("Failed to push events to redis")?;

        Ok(())
    }
}
