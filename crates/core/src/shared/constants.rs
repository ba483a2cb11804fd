pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";
pub const DETECT_PATH: &str = "/api/v1/deepface/detect";
pub const TRACK_PATH: &str = "/api/v1/deepface/track";

/// File name attached to the `image` multipart field.
pub const UPLOAD_FILE_NAME: &str = "image.png";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Label anchor offset from a box's top-left corner, in pixels.
pub const LABEL_OFFSET: (i32, i32) = (2, 15);
