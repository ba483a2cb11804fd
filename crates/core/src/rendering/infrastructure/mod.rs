pub mod frame_surface;
