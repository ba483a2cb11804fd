//! Stubs shared by unit tests: a recording surface, scripted services and
//! an in-memory frame source.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::capture::domain::frame_source::{CaptureError, DeviceDescriptor, FrameSource};
use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::detection_service::{DetectionResponse, DetectionService};
use crate::matching::domain::matching_service::{
    MatchRequest, MatchResponse, MatchResult, MatchingService,
};
use crate::rendering::domain::render_surface::{DrawStyle, RenderSurface};
use crate::service::service_error::ServiceError;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::shared::tracking_config::FaceModel;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawCall {
    Frame(u32, u32),
    Style(DrawStyle),
    Rect(BoundingBox),
    Text(String, i32, i32),
    Present,
}

/// Surface stub that records every call; clones share the record.
#[derive(Clone, Default)]
pub(crate) struct RecordingSurface {
    calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rects(&self) -> Vec<BoundingBox> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DrawCall::Rect(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn frames(&self) -> Vec<(u32, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DrawCall::Frame(w, h) => Some((w, h)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: DrawCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RenderSurface for RecordingSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.frames().last().copied().unwrap_or((0, 0))
    }

    fn draw_frame(&mut self, frame: &Frame) {
        self.push(DrawCall::Frame(frame.width(), frame.height()));
    }

    fn set_style(&mut self, style: &DrawStyle) {
        self.push(DrawCall::Style(*style));
    }

    fn stroke_rect(&mut self, rect: &BoundingBox) {
        self.push(DrawCall::Rect(*rect));
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32) {
        self.push(DrawCall::Text(text.to_string(), x, y));
    }

    fn present(&mut self) {
        self.push(DrawCall::Present);
    }
}

/// Live source producing blank frames of a fixed size, optionally a
/// limited number of them.
pub(crate) struct StubSource {
    width: u32,
    height: u32,
    remaining: Option<usize>,
    live: bool,
    closed: Arc<AtomicBool>,
}

impl StubSource {
    pub fn live(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            remaining: None,
            live: true,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn still(width: u32, height: u32) -> Self {
        Self {
            live: false,
            ..Self::live(width, height)
        }
    }

    pub fn with_frames(mut self, count: usize) -> Self {
        self.remaining = Some(count);
        self
    }

    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

impl FrameSource for StubSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        match self.remaining {
            Some(0) => return Err(CaptureError::Exhausted),
            Some(ref mut n) => *n -= 1,
            None => {}
        }
        Ok(Frame::blank(self.width, self.height))
    }

    fn is_live(&self) -> bool {
        self.live && self.remaining != Some(0) && !self.closed.load(Ordering::Relaxed)
    }

    fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor::new("stub", "stub")
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::Relaxed);
    }
}

type Hook = Box<dyn FnMut() + Send>;

/// Matching service answering from a script; an exhausted script answers
/// with an empty response. The hook runs while the "request" is in flight.
#[derive(Clone, Default)]
pub(crate) struct StubMatcher {
    responses: Arc<Mutex<VecDeque<Result<MatchResponse, String>>>>,
    requests: Arc<Mutex<Vec<MatchRequest>>>,
    hook: Arc<Mutex<Option<Hook>>>,
}

impl StubMatcher {
    pub fn push(&self, response: Result<MatchResponse, String>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<MatchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn on_call(&self, hook: impl FnMut() + Send + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }
}

impl MatchingService for StubMatcher {
    fn match_faces(&self, request: &MatchRequest) -> Result<MatchResponse, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(hook) = self.hook.lock().unwrap().as_mut() {
            hook();
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(MatchResponse::default()))
            .map_err(ServiceError::Service)
    }
}

/// Detection service answering from a script.
#[derive(Clone, Default)]
pub(crate) struct StubDetector {
    responses: Arc<Mutex<VecDeque<Result<DetectionResponse, String>>>>,
    models: Arc<Mutex<Vec<FaceModel>>>,
}

impl StubDetector {
    pub fn push(&self, response: Result<DetectionResponse, String>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn models(&self) -> Vec<FaceModel> {
        self.models.lock().unwrap().clone()
    }
}

impl DetectionService for StubDetector {
    fn detect(
        &self,
        _image_png: &[u8],
        model: FaceModel,
    ) -> Result<DetectionResponse, ServiceError> {
        self.models.lock().unwrap().push(model);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DetectionResponse::default()))
            .map_err(ServiceError::Service)
    }
}

pub(crate) fn face(index: usize) -> DetectedFace {
    DetectedFace::new(
        index,
        BoundingBox::new(index as i32 * 20, 10, 16, 16),
        vec![0.1 * (index + 1) as f64, 0.5],
    )
}

pub(crate) fn detection(boxes: &[BoundingBox]) -> DetectionResponse {
    DetectionResponse {
        entries: boxes.to_vec(),
        embeddings: boxes
            .iter()
            .enumerate()
            .map(|(i, _)| vec![i as f64, 1.0])
            .collect(),
    }
}

pub(crate) fn matches(entries: &[(BoundingBox, bool)]) -> MatchResponse {
    MatchResponse {
        entries: entries.iter().map(|(b, _)| *b).collect(),
        results: entries
            .iter()
            .map(|(_, verified)| MatchResult {
                verified: *verified,
                distance: Some(if *verified { 0.2 } else { 1.4 }),
            })
            .collect(),
        threshold: Some(1.04),
    }
}
