use serde::Deserialize;

use crate::service::service_error::ServiceError;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::lenient::list_or_empty;
use crate::shared::tracking_config::FaceModel;

/// Raw detection result: boxes and embeddings as parallel arrays.
///
/// Absent or malformed lists deserialize as empty. Pairing happens in
/// [`crate::detection::detection_client::DetectionClient`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectionResponse {
    #[serde(deserialize_with = "list_or_empty")]
    pub entries: Vec<BoundingBox>,
    #[serde(deserialize_with = "list_or_empty")]
    pub embeddings: Vec<Vec<f64>>,
}

/// Remote face detection + embedding endpoint.
pub trait DetectionService: Send {
    fn detect(&self, image_png: &[u8], model: FaceModel)
        -> Result<DetectionResponse, ServiceError>;
}
