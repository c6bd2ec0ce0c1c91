use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::models::prediction::{JobOutput, Prediction};
use crate::services::poller::Poller;
use crate::services::prediction::{PredictionClient, PredictionError};
use crate::services::prompts::{self, PHOTO_VARIATIONS};

pub const IMAGE_MODEL: &str = "bytedance/seedream-4.5";
pub const VIDEO_MODEL: &str = "google/veo-3.1";

pub const DEFAULT_PHOTO_ASPECT: &str = "1:1";
pub const DEFAULT_VIDEO_ASPECT: &str = "9:16";
pub const DEFAULT_VIDEO_DURATION: u32 = 8;

/// Input of the Seedream image model.
#[derive(Debug, Clone, Serialize)]
pub struct ImageInput {
    pub size: &'static str,
    pub width: u32,
    pub height: u32,
    pub prompt: String,
    pub max_images: u32,
    pub image_input: Vec<String>,
    pub aspect_ratio: String,
    pub sequential_image_generation: &'static str,
}

impl ImageInput {
    fn new(prompt: String, images: Vec<String>, width: u32, height: u32, aspect: &str) -> Self {
        Self {
            size: "4K",
            width,
            height,
            prompt,
            max_images: 1,
            image_input: images,
            aspect_ratio: aspect.to_string(),
            sequential_image_generation: "disabled",
        }
    }
}

/// Input of the Veo video model.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInput {
    pub prompt: String,
    pub duration: u32,
    pub resolution: &'static str,
    pub aspect_ratio: String,
    pub generate_audio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_images: Option<Vec<String>>,
}

impl VideoInput {
    pub fn new(
        prompt: &str,
        reference_image_url: Option<&str>,
        duration: Option<u32>,
        aspect_ratio: Option<&str>,
    ) -> Self {
        Self {
            prompt: prompt.to_string(),
            duration: duration.unwrap_or(DEFAULT_VIDEO_DURATION),
            resolution: "1080p",
            aspect_ratio: aspect_ratio.unwrap_or(DEFAULT_VIDEO_ASPECT).to_string(),
            generate_audio: true,
            reference_images: reference_image_url
                .filter(|url| !url.is_empty())
                .map(|url| vec![url.to_string()]),
        }
    }
}

/// A generated UGC still with the prompt that produced it.
#[derive(Debug, Clone)]
pub struct UgcImage {
    pub output_url: String,
    pub prompt: String,
}

/// Runs predictions end to end: submit, poll, pick the output.
pub struct GenerationService {
    client: Arc<PredictionClient>,
    poller: Poller,
}

impl GenerationService {
    pub fn new(client: Arc<PredictionClient>, poller: Poller) -> Self {
        Self { client, poller }
    }

    pub fn client(&self) -> &PredictionClient {
        &self.client
    }

    /// Submit one job and block until it reaches a terminal status.
    pub async fn run<I: Serialize>(
        &self,
        model: &str,
        input: &I,
        follow_callback: bool,
    ) -> Result<(Prediction, JobOutput), PredictionError> {
        let start = Instant::now();
        let submitted = self.client.create_prediction(model, input).await?;
        metrics::counter!("predictions_submitted_total", "model" => model.to_string()).increment(1);

        tracing::info!(
            prediction_id = %submitted.id,
            model,
            status = %submitted.status,
            "Prediction submitted"
        );

        let target = self.client.poll_target(&submitted, follow_callback);
        let result = self.poller.wait(&self.client, &target).await;
        metrics::histogram!("prediction_duration_seconds", "model" => model.to_string())
            .record(start.elapsed().as_secs_f64());

        let finished = match result {
            Ok(p) => p,
            Err(e) => {
                let counter = match e {
                    PredictionError::JobTimeout { .. } => "predictions_timed_out_total",
                    _ => "predictions_failed_total",
                };
                metrics::counter!(counter, "model" => model.to_string()).increment(1);
                return Err(e);
            }
        };
        metrics::counter!("predictions_succeeded_total", "model" => model.to_string())
            .increment(1);

        let output = finished.job_output();
        tracing::info!(
            prediction_id = %finished.id,
            model,
            outputs = output.urls.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Prediction finished"
        );
        Ok((finished, output))
    }

    async fn run_single<I: Serialize>(
        &self,
        model: &str,
        input: &I,
        follow_callback: bool,
    ) -> Result<(Prediction, String), PredictionError> {
        let (prediction, output) = self.run(model, input, follow_callback).await?;
        let url = output.first().ok_or(PredictionError::NoOutput)?.to_string();
        Ok((prediction, url))
    }

    /// Relight a single photo.
    pub async fn restyle(&self, image: &str) -> Result<String, PredictionError> {
        let input = ImageInput::new(
            prompts::restyle_prompt(),
            vec![prompts::image_data_uri(image, "image/jpeg")],
            2048,
            2048,
            "1:1",
        );
        let (_, url) = self.run_single(IMAGE_MODEL, &input, false).await?;
        Ok(url)
    }

    /// Four independent generations of the same scene.
    ///
    /// All jobs run to completion; failed ones are logged and left out. The
    /// result keeps variation order and is empty only if every job failed.
    pub async fn create_photos(&self, prompt: &str, image: &str, aspect_ratio: &str) -> Vec<String> {
        let base = prompts::photo_prompt(prompt);
        let image = prompts::image_data_uri(image, "image/jpeg");

        let jobs = (0..PHOTO_VARIATIONS).map(|index| {
            let input = ImageInput::new(
                prompts::photo_variation(&base, index),
                vec![image.clone()],
                2048,
                2048,
                aspect_ratio,
            );
            async move {
                match self.run_single(IMAGE_MODEL, &input, false).await {
                    Ok((_, url)) => Some(url),
                    Err(e) => {
                        tracing::error!(variation = index + 1, error = %e, "Photo variation failed");
                        None
                    }
                }
            }
        });

        join_all(jobs).await.into_iter().flatten().collect()
    }

    /// Vertical UGC still of an actor presenting a product.
    pub async fn create_ugc(
        &self,
        actor_name: &str,
        product_name: &str,
        actor_image: &str,
        product_image: &str,
    ) -> Result<UgcImage, PredictionError> {
        let prompt = prompts::ugc_prompt(actor_name, product_name);
        let input = ImageInput::new(
            prompt.clone(),
            vec![
                prompts::image_data_uri(actor_image, "image/jpeg"),
                prompts::image_data_uri(product_image, "image/png"),
            ],
            1152,
            2048,
            "9:16",
        );
        let (_, output_url) = self.run_single(IMAGE_MODEL, &input, false).await?;
        Ok(UgcImage { output_url, prompt })
    }

    /// Generate a video and wait for it, following the provider's status URL.
    pub async fn create_video(&self, input: &VideoInput) -> Result<(String, String), PredictionError> {
        let (prediction, url) = self.run_single(VIDEO_MODEL, input, true).await?;
        Ok((prediction.id, url))
    }

    /// Submit a video job without waiting; callers poll [`Self::status`].
    pub async fn start_video(&self, input: &VideoInput) -> Result<Prediction, PredictionError> {
        let prediction = self.client.create_prediction(VIDEO_MODEL, input).await?;
        metrics::counter!("predictions_submitted_total", "model" => VIDEO_MODEL).increment(1);
        tracing::info!(prediction_id = %prediction.id, model = VIDEO_MODEL, "Video prediction started");
        Ok(prediction)
    }

    pub async fn status(&self, prediction_id: &str) -> Result<Prediction, PredictionError> {
        self.client.get_prediction(prediction_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_input_defaults() {
        let input = VideoInput::new("a product demo", None, None, None);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["duration"], 8);
        assert_eq!(json["resolution"], "1080p");
        assert_eq!(json["aspect_ratio"], "9:16");
        assert_eq!(json["generate_audio"], true);
        assert!(json.get("reference_images").is_none());
    }

    #[test]
    fn test_video_reference_image_as_bare_url() {
        let input = VideoInput::new("demo", Some("https://x/actor.jpg"), Some(4), Some("16:9"));
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["reference_images"][0], "https://x/actor.jpg");
        assert_eq!(json["duration"], 4);
        assert_eq!(json["aspect_ratio"], "16:9");
    }

    #[test]
    fn test_image_input_shape() {
        let input = ImageInput::new("p".to_string(), vec!["data:a".to_string()], 1152, 2048, "9:16");
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["size"], "4K");
        assert_eq!(json["max_images"], 1);
        assert_eq!(json["sequential_image_generation"], "disabled");
        assert_eq!(json["image_input"].as_array().unwrap().len(), 1);
    }
}
