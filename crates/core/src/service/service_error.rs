use thiserror::Error;

/// Transport or service-level failure of a remote face service call.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to encode frame: {0}")]
    Encode(#[source] image::ImageError),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("service reported an error: {0}")]
    Service(String),
}
