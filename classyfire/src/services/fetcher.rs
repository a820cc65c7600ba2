//! Rate-limited classification fetcher
//!
//! Wraps a [`ClassificationTransport`] with:
//! - a minimum spacing between the end of one request and the start of the
//!   next (ClassyFire allows 12 requests per minute, hence 5 s by default)
//! - a per-request timeout
//! - response interpretation into [`Classification`]
//!
//! The throttle state lives in the fetcher, so two clients with different
//! limits never interfere. The lock is held for the whole request, which
//! serializes concurrent callers on the same fetcher.

use crate::error::{ClassyFireError, Result};
use crate::models::{parse_response, Classification, Identifier};
use crate::services::transport::ClassificationTransport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

/// Fetches one classification at a time, never faster than `min_interval`
pub struct RateLimitedFetcher {
    transport: Arc<dyn ClassificationTransport>,
    timeout: Duration,
    min_interval: Duration,
    /// Completion time of the previous request
    last_call: Mutex<Option<Instant>>,
}

impl RateLimitedFetcher {
    pub fn new(
        transport: Arc<dyn ClassificationTransport>,
        timeout: Duration,
        min_interval: Duration,
    ) -> Self {
        Self {
            transport,
            timeout,
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Fetch the classification of `identifier`
    ///
    /// # Errors
    /// - `RemoteService` on transport failure, HTTP error status or timeout
    /// - `MalformedResponse` when the payload is neither a classification
    ///   nor the empty shape
    pub async fn fetch(&self, identifier: &Identifier) -> Result<Classification> {
        let mut last_call = self.last_call.lock().await;

        if let Some(last_time) = *last_call {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!(
                    wait_ms = wait_time.as_millis() as u64,
                    "Rate limiting: sleeping before ClassyFire request"
                );
                sleep(wait_time).await;
            }
        }

        let outcome = match timeout(self.timeout, self.transport.request(identifier)).await {
            Ok(response) => response.and_then(|value| parse_response(identifier, value)),
            Err(_) => Err(ClassyFireError::RemoteService {
                identifier: identifier.to_string(),
                status: None,
                message: format!("timed out after {:?}", self.timeout),
            }),
        };

        // Recorded on failure too, so an immediate retry still waits
        *last_call = Some(Instant::now());

        if let Ok(classification) = &outcome {
            match classification.compound() {
                Some(compound) => info!(
                    identifier = %identifier,
                    kingdom = %compound.kingdom.name,
                    "Retrieved classification from ClassyFire"
                ),
                None => debug!(identifier = %identifier, "ClassyFire returned an empty classification"),
            }
        }

        outcome
    }
}
