use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lifecycle of a provider prediction. Only `Succeeded` and `Failed` end a poll.
///
/// Statuses this service does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(untagged)]
    Other(String),
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PredictionStatus::Succeeded | PredictionStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
            PredictionStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Links the provider attaches to a prediction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionUrls {
    #[serde(default)]
    pub get: Option<String>,
}

/// A prediction as returned by the create and status endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

impl Prediction {
    /// Provider error text, if the prediction carries one.
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.urls.as_ref().and_then(|u| u.get.as_deref())
    }

    pub fn job_output(&self) -> JobOutput {
        JobOutput::from_value(self.output.as_ref())
    }
}

/// Output URLs of a finished prediction, whatever shape the model returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobOutput {
    pub urls: Vec<String>,
}

impl JobOutput {
    /// Accepts a bare URL, a list of URLs, a `{url}` object, or a list of those.
    pub fn from_value(output: Option<&Value>) -> Self {
        let mut urls = Vec::new();
        if let Some(value) = output {
            collect_urls(value, &mut urls);
        }
        Self { urls }
    }

    pub fn first(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn collect_urls(value: &Value, urls: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => urls.push(s.clone()),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(_) => {}
                    other => collect_urls(other, urls),
                }
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(url)) = map.get("url") {
                if !url.is_empty() {
                    urls.push(url.clone());
                }
            }
        }
        _ => {}
    }
}
