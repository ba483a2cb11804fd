pub mod http_face_service;
