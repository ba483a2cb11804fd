//! Client-side capture, detect and track loop for a remote face service.
//!
//! A [`session::face_track_session::FaceTrackSession`] owns one frame
//! source, the current selection and a render surface, and drives
//! back-to-back match requests for the pinned face.

pub mod shared {
    pub mod bounding_box;
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod image_codec;
    pub(crate) mod lenient;
    pub mod settings;
    pub mod tracking_config;
}

pub mod capture {
    pub mod domain {
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod service {
    pub mod service_error;
    pub mod infrastructure;
}

pub mod detection {
    pub mod detection_client;
    pub mod domain {
        pub mod detected_face;
        pub mod detection_service;
    }
}

pub mod matching {
    pub mod domain {
        pub mod matching_service;
    }
}

pub mod selection {
    pub mod selection_state;
}

pub mod rendering {
    pub mod render_coordinator;
    pub mod domain {
        pub mod render_surface;
    }
    pub mod infrastructure;
}

pub mod tracking {
    pub mod hidden_buffer;
    pub mod tracking_controller;
    pub mod tracking_logger;
}

pub mod session {
    pub mod command;
    pub mod face_track_session;
}

#[cfg(test)]
pub(crate) mod test_support;
