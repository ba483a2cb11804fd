use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::detection::domain::detection_service::{DetectionResponse, DetectionService};
use crate::matching::domain::matching_service::{MatchRequest, MatchResponse, MatchingService};
use crate::service::service_error::ServiceError;
use crate::shared::constants::{DETECT_PATH, TRACK_PATH, UPLOAD_FILE_NAME};
use crate::shared::tracking_config::FaceModel;

/// Body shape of both endpoints: either an `error` report or a result.
///
/// The service answers "no face found" with HTTP 200 and an `error` body,
/// so the failure arm has to be tried first.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failure { error: serde_json::Value },
    Success(T),
}

/// Blocking multipart client for the remote detection and matching
/// endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpFaceService {
    client: Client,
    detect_url: String,
    track_url: String,
}

impl HttpFaceService {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base = endpoint.trim_end_matches('/');
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ServiceError::Transport {
                url: base.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            detect_url: format!("{base}{DETECT_PATH}"),
            track_url: format!("{base}{TRACK_PATH}"),
        })
    }

    pub fn detect_url(&self) -> &str {
        &self.detect_url
    }

    pub fn track_url(&self) -> &str {
        &self.track_url
    }

    fn post<T: DeserializeOwned>(&self, url: &str, form: multipart::Form) -> Result<T, ServiceError> {
        let transport = |source| ServiceError::Transport {
            url: url.to_string(),
            source,
        };
        let envelope: Envelope<T> = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(transport)?
            .json()
            .map_err(transport)?;
        match envelope {
            Envelope::Success(body) => Ok(body),
            Envelope::Failure { error } => Err(ServiceError::Service(describe(&error))),
        }
    }
}

impl DetectionService for HttpFaceService {
    fn detect(
        &self,
        image_png: &[u8],
        model: FaceModel,
    ) -> Result<DetectionResponse, ServiceError> {
        let form = multipart::Form::new()
            .part("image", image_part(image_png, &self.detect_url)?)
            .text("model", model.as_str());
        self.post(&self.detect_url, form)
    }
}

impl MatchingService for HttpFaceService {
    fn match_faces(&self, request: &MatchRequest) -> Result<MatchResponse, ServiceError> {
        let form = multipart::Form::new()
            .part("image", image_part(&request.image_png, &self.track_url)?)
            .text("embedding", request.embedding.clone())
            .text("model", request.model.as_str())
            .text("metric", request.metric.as_str());
        self.post(&self.track_url, form)
    }
}

fn image_part(png: &[u8], url: &str) -> Result<multipart::Part, ServiceError> {
    multipart::Part::bytes(png.to_vec())
        .file_name(UPLOAD_FILE_NAME)
        .mime_str("image/png")
        .map_err(|source| ServiceError::Transport {
            url: url.to_string(),
            source,
        })
}

/// Flattens the service's `error` payload (usually a list of messages).
fn describe(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
