use std::time::Duration;
use tokio::time::sleep;

use crate::models::prediction::{Prediction, PredictionStatus};
use crate::services::prediction::{PollTarget, PredictionClient, PredictionError};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

/// Fixed-interval status polling with a hard attempt ceiling.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

impl Poller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Query `target` until the prediction succeeds or fails.
    ///
    /// Every non-terminal status costs one attempt and one interval of sleep.
    /// After `max_attempts` queries without a terminal status the wait ends
    /// with [`PredictionError::JobTimeout`]. Errors while fetching the status
    /// end the wait immediately; a rejected status query is reported as
    /// [`PredictionError::Poll`].
    pub async fn wait(
        &self,
        client: &PredictionClient,
        target: &PollTarget,
    ) -> Result<Prediction, PredictionError> {
        for attempt in 1..=self.max_attempts {
            let prediction = match client.fetch(target).await {
                Ok(prediction) => prediction,
                Err(PredictionError::Status { status, detail }) => {
                    tracing::warn!(
                        poll_target = ?target,
                        attempt,
                        status,
                        detail = ?detail,
                        "Status query rejected"
                    );
                    return Err(PredictionError::Poll { status, detail });
                }
                Err(e) => return Err(e),
            };

            match prediction.status {
                PredictionStatus::Succeeded => {
                    tracing::debug!(prediction_id = %prediction.id, attempt, "Prediction succeeded");
                    return Ok(prediction);
                }
                PredictionStatus::Failed => {
                    let message = prediction
                        .error_message()
                        .unwrap_or_else(|| "Prediction failed".to_string());
                    tracing::warn!(
                        prediction_id = %prediction.id,
                        attempt,
                        error = %message,
                        "Prediction failed"
                    );
                    return Err(PredictionError::JobFailed(message));
                }
                ref status => {
                    tracing::trace!(
                        prediction_id = %prediction.id,
                        attempt,
                        max_attempts = self.max_attempts,
                        %status,
                        "Prediction still running"
                    );
                    if attempt < self.max_attempts {
                        sleep(self.interval).await;
                    }
                }
            }
        }

        tracing::warn!(
            poll_target = ?target,
            attempts = self.max_attempts,
            "Prediction timed out"
        );
        Err(PredictionError::JobTimeout {
            attempts: self.max_attempts,
        })
    }
}
