use thiserror::Error;

use crate::capture::domain::frame_source::CaptureError;
use crate::service::service_error::ServiceError;

/// Failures of the capture/detect/track operations.
///
/// None of these are fatal to the tracking loop: callers log them and
/// carry on with unchanged state.
#[derive(Error, Debug)]
pub enum FaceTrackError {
    #[error("no live stream and no loaded image to capture from")]
    NoActiveSource,
    #[error("frame capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("detection failed: {0}")]
    DetectionFailed(#[source] ServiceError),
    #[error("match failed: {0}")]
    MatchFailed(#[source] ServiceError),
    #[error("no face is pinned for tracking")]
    NoActiveFace,
    #[error("tracking needs a live frame source")]
    SourceNotLive,
    #[error("tracking is not active")]
    NotTracking,
    #[error("no detected face at index {0}")]
    NoSuchCandidate(usize),
}
