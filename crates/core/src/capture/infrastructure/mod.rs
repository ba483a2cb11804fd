pub mod frame_sequence_source;
pub mod static_image_source;
