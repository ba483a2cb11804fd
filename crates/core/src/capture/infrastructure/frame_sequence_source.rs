use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{CaptureError, DeviceDescriptor, FrameSource};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::image_codec;

/// Treats a directory of image files as a live camera.
///
/// Each capture decodes the next file in name order. Without looping the
/// stream ends after the last file and the source stops being live.
pub struct FrameSequenceSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    position: usize,
    looping: bool,
    open: bool,
}

impl FrameSequenceSource {
    pub fn open(dir: &Path, looping: bool) -> Result<Self, CaptureError> {
        let files = image_files(dir)?;
        if files.is_empty() {
            return Err(CaptureError::EmptySequence(dir.to_path_buf()));
        }
        log::info!("Opened {} ({} frames)", dir.display(), files.len());
        Ok(Self {
            dir: dir.to_path_buf(),
            files,
            position: 0,
            looping,
            open: true,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Index of the next frame to be captured.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl FrameSource for FrameSequenceSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        if !self.is_live() {
            return Err(CaptureError::Exhausted);
        }
        let path = &self.files[self.position];
        let bytes = fs::read(path).map_err(|source| CaptureError::Io {
            path: path.clone(),
            source,
        })?;
        let frame = image_codec::decode(&bytes).map_err(|source| CaptureError::Decode {
            path: path.clone(),
            source,
        })?;

        self.position += 1;
        if self.looping && self.position == self.files.len() {
            self.position = 0;
        }
        Ok(frame)
    }

    fn is_live(&self) -> bool {
        self.open && self.position < self.files.len()
    }

    fn descriptor(&self) -> DeviceDescriptor {
        descriptor_for(&self.dir)
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Lists frame directories under `root` as capture devices.
///
/// A `root` that holds frames itself is reported as a single `default`
/// device.
pub fn list_devices(root: &Path) -> Result<Vec<DeviceDescriptor>, CaptureError> {
    if !image_files(root)?.is_empty() {
        return Ok(vec![DeviceDescriptor::new(
            root.display().to_string(),
            "default",
        )]);
    }

    let entries = fs::read_dir(root).map_err(|source| CaptureError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let mut devices = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() && image_files(&path).is_ok_and(|files| !files.is_empty()) {
            devices.push(descriptor_for(&path));
        }
    }
    devices.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(devices)
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn image_files(dir: &Path) -> Result<Vec<PathBuf>, CaptureError> {
    let entries = fs::read_dir(dir).map_err(|source| CaptureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image(p))
        .collect();
    files.sort();
    Ok(files)
}

fn descriptor_for(dir: &Path) -> DeviceDescriptor {
    let label = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "default".to_string());
    DeviceDescriptor::new(dir.display().to_string(), label)
}
