use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::models::prediction::Prediction;

/// Client for the Replicate predictions API.
pub struct PredictionClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct CreatePredictionBody<'a, I: Serialize> {
    input: &'a I,
}

/// Where the status of a running prediction is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    /// Generic status endpoint, `GET {base}/predictions/{id}`.
    Id(String),
    /// Status URL handed out by the provider with the prediction.
    Url(String),
}

impl PredictionClient {
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }

    /// Fails when no API token was configured.
    pub fn ensure_configured(&self) -> Result<(), PredictionError> {
        self.token().map(|_| ())
    }

    /// Where to poll `prediction`. The provider's status URL is only followed
    /// when asked and when it lives under the configured base URL, since the
    /// token is sent along with it.
    pub fn poll_target(&self, prediction: &Prediction, follow_callback: bool) -> PollTarget {
        match prediction.callback_url() {
            Some(url) if follow_callback && self.is_own_url(url) => PollTarget::Url(url.to_string()),
            Some(url) if follow_callback => {
                tracing::warn!(
                    prediction_id = %prediction.id,
                    callback_url = url,
                    "Ignoring status URL outside the provider base URL"
                );
                PollTarget::Id(prediction.id.clone())
            }
            _ => PollTarget::Id(prediction.id.clone()),
        }
    }

    fn is_own_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    fn token(&self) -> Result<&str, PredictionError> {
        self.api_token
            .as_deref()
            .ok_or(PredictionError::MissingCredential)
    }

    /// Submit a job to `model` (e.g. "bytedance/seedream-4.5").
    pub async fn create_prediction<I: Serialize>(
        &self,
        model: &str,
        input: &I,
    ) -> Result<Prediction, PredictionError> {
        let url = format!("{}/models/{}/predictions", self.base_url, model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token()?)
            .json(&CreatePredictionBody { input })
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            tracing::error!(
                model,
                status = status.as_u16(),
                detail = ?detail,
                "Prediction submission rejected"
            );
            return Err(PredictionError::Submission {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<Prediction>().await?)
    }

    /// Current state of a prediction by id.
    pub async fn get_prediction(&self, id: &str) -> Result<Prediction, PredictionError> {
        self.fetch(&PollTarget::Id(id.to_string())).await
    }

    pub async fn fetch(&self, target: &PollTarget) -> Result<Prediction, PredictionError> {
        let url = match target {
            PollTarget::Id(id) => format!("{}/predictions/{}", self.base_url, id),
            PollTarget::Url(url) => url.clone(),
        };

        let response = self.http.get(&url).bearer_auth(self.token()?).send().await?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            return Err(PredictionError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<Prediction>().await?)
    }
}

/// Pull `detail` (or `error`) out of a provider error body.
async fn error_detail(response: Response) -> (StatusCode, Option<String>) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
        ["detail", "error"]
            .iter()
            .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
    });
    (status, detail)
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("API token not configured")]
    MissingCredential,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", .detail.as_deref().unwrap_or("Failed to start prediction"))]
    Submission { status: u16, detail: Option<String> },

    #[error("{}", .detail.as_deref().unwrap_or("Failed to poll for results"))]
    Status { status: u16, detail: Option<String> },

    /// A status query failed while waiting on a prediction.
    #[error("{}", .detail.as_deref().unwrap_or("Failed to poll for results"))]
    Poll { status: u16, detail: Option<String> },

    #[error("{0}")]
    JobFailed(String),

    #[error("Prediction timed out")]
    JobTimeout { attempts: u32 },

    #[error("No output received")]
    NoOutput,
}
