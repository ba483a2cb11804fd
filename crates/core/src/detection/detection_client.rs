use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::detection_service::{DetectionResponse, DetectionService};
use crate::service::service_error::ServiceError;
use crate::shared::error::FaceTrackError;
use crate::shared::frame::Frame;
use crate::shared::image_codec;
use crate::shared::tracking_config::TrackingConfig;

/// Sends one frame to the detection service and turns the reply into
/// candidate faces.
pub struct DetectionClient {
    service: Box<dyn DetectionService>,
}

impl DetectionClient {
    pub fn new(service: Box<dyn DetectionService>) -> Self {
        Self { service }
    }

    /// Detects faces in `frame` with the configured model.
    ///
    /// An empty result is a valid "no face" answer. Encoding and service
    /// failures come back as [`FaceTrackError::DetectionFailed`].
    pub fn detect(
        &self,
        frame: &Frame,
        config: &TrackingConfig,
    ) -> Result<Vec<DetectedFace>, FaceTrackError> {
        let png = image_codec::encode_png(frame)
            .map_err(|e| FaceTrackError::DetectionFailed(ServiceError::Encode(e)))?;
        let response = self
            .service
            .detect(&png, config.model)
            .map_err(FaceTrackError::DetectionFailed)?;
        let faces = pair_faces(response);
        log::debug!("Detection with {} found {} face(s)", config.model, faces.len());
        Ok(faces)
    }
}

/// Pairs entry `i` with embedding `i`, in response order.
///
/// Arrays of different lengths are malformed and yield no faces.
pub fn pair_faces(response: DetectionResponse) -> Vec<DetectedFace> {
    let DetectionResponse {
        entries,
        embeddings,
    } = response;
    if entries.len() != embeddings.len() {
        log::warn!(
            "Malformed detection response: {} entries but {} embeddings; ignoring",
            entries.len(),
            embeddings.len()
        );
        return Vec::new();
    }
    entries
        .into_iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (bbox, embedding))| DetectedFace::new(i, bbox, embedding))
        .collect()
}
