use std::ops::ControlFlow;
use std::path::Path;
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::capture::domain::frame_source::FrameSource;
use crate::capture::infrastructure::static_image_source::StaticImageSource;
use crate::detection::detection_client::DetectionClient;
use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::detection_service::DetectionService;
use crate::matching::domain::matching_service::MatchingService;
use crate::rendering::domain::render_surface::RenderSurface;
use crate::rendering::render_coordinator::RenderCoordinator;
use crate::session::command::Command;
use crate::shared::error::FaceTrackError;
use crate::shared::frame::Frame;
use crate::shared::tracking_config::{DistanceMetric, FaceModel, TrackingConfig};
use crate::tracking::tracking_controller::{CycleOutcome, TrackingController, TrackingState};
use crate::tracking::tracking_logger::{NullTrackingLogger, TrackingLogger};

/// Ties the frame source, both remote services, the selection and the
/// visible surface together, and drives the tracking loop.
///
/// Everything runs on the caller's thread. The only blocking points are
/// the two service calls and, while idle, waiting for the next command.
pub struct FaceTrackSession {
    source: Option<Box<dyn FrameSource>>,
    still: Option<Frame>,
    config: TrackingConfig,
    detector: DetectionClient,
    matcher: Box<dyn MatchingService>,
    surface: Box<dyn RenderSurface>,
    controller: TrackingController,
    logger: Box<dyn TrackingLogger>,
}

impl FaceTrackSession {
    pub fn new(
        detector: Box<dyn DetectionService>,
        matcher: Box<dyn MatchingService>,
        surface: Box<dyn RenderSurface>,
        config: TrackingConfig,
    ) -> Self {
        Self {
            source: None,
            still: None,
            config,
            detector: DetectionClient::new(detector),
            matcher,
            surface,
            controller: TrackingController::new(RenderCoordinator::default()),
            logger: Box::new(NullTrackingLogger),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn TrackingLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> TrackingConfig {
        self.config
    }

    pub fn state(&self) -> TrackingState {
        self.controller.state()
    }

    pub fn controller(&self) -> &TrackingController {
        &self.controller
    }

    pub fn active_face(&self) -> Option<&DetectedFace> {
        self.controller.selection().active_face()
    }

    pub fn candidates(&self) -> &[DetectedFace] {
        self.controller.selection().candidates()
    }

    /// Frame currently shown on the surface, if any.
    pub fn still(&self) -> Option<&Frame> {
        self.still.as_ref()
    }

    pub fn has_live_source(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.is_live())
    }

    // ── Source handling ──────────────────────────────────────────────

    /// Replaces the live source. Tracking goes Idle and the selection is
    /// cleared before the old source is closed.
    pub fn switch_source(&mut self, source: Option<Box<dyn FrameSource>>) {
        self.controller.reset_selection();
        if let Some(mut old) = self.source.take() {
            old.close();
        }
        match &source {
            Some(s) => {
                let device = s.descriptor();
                log::info!("Using source '{}' ({})", device.label, device.id);
            }
            None => log::info!("Live source stopped"),
        }
        self.source = source;
    }

    /// Shows an image file as the still. The live source stays attached.
    pub fn load_image(&mut self, path: &Path) -> Result<(), FaceTrackError> {
        let frame = StaticImageSource::open(path)?.into_frame();
        self.controller.reset_selection();
        self.show_still(frame);
        log::info!("Loaded {}", path.display());
        Ok(())
    }

    /// Freezes the current live frame as the still.
    pub fn capture(&mut self) -> Result<(), FaceTrackError> {
        let source = match self.source.as_deref_mut() {
            Some(s) if s.is_live() => s,
            _ => return Err(FaceTrackError::NoActiveSource),
        };
        self.controller.stop();
        let frame = source.capture()?;
        self.controller.reset_selection();
        self.show_still(frame);
        Ok(())
    }

    fn show_still(&mut self, frame: Frame) {
        let frame = self.still.insert(frame);
        self.controller
            .coordinator()
            .draw_still(self.surface.as_mut(), frame);
    }

    // ── Detection and selection ──────────────────────────────────────

    /// Detects faces in the still, capturing one from the live source
    /// first if nothing is shown yet.
    ///
    /// The first face is pinned and every candidate is drawn with its
    /// index. On failure the selection is left as it was.
    pub fn detect(&mut self) -> Result<&[DetectedFace], FaceTrackError> {
        self.controller.stop();
        if self.still.is_none() {
            match self.source.as_deref_mut() {
                Some(source) if source.is_live() => {
                    let frame = source.capture()?;
                    self.show_still(frame);
                }
                _ => return Err(FaceTrackError::NoActiveSource),
            }
        }
        let Some(still) = self.still.as_ref() else {
            return Err(FaceTrackError::NoActiveSource);
        };

        let faces = self.detector.detect(still, &self.config)?;
        self.logger
            .info(&format!("Detected {} face(s) with {}", faces.len(), self.config.model));
        self.controller.replace_candidates(faces);
        self.controller.coordinator().draw_candidates(
            self.surface.as_mut(),
            still,
            self.controller.selection().candidates(),
        );
        Ok(self.controller.selection().candidates())
    }

    /// Pins the candidate at `index`.
    pub fn select(&mut self, index: usize) -> Result<&DetectedFace, FaceTrackError> {
        let face = self.controller.select_candidate(index)?;
        log::info!("Pinned face {}", face.id());
        Ok(face)
    }

    /// Pins `face` whether or not it came from the current candidates.
    pub fn pin(&mut self, face: DetectedFace) {
        log::info!("Pinned face {}", face.id());
        self.controller.select(face);
    }

    // ── Tracking ─────────────────────────────────────────────────────

    /// Starts tracking the pinned face in the live source. Cycles run from
    /// [`FaceTrackSession::run`].
    pub fn start_tracking(&mut self) -> Result<(), FaceTrackError> {
        let live = self.has_live_source();
        self.controller.start(live)
    }

    pub fn stop_tracking(&mut self) -> bool {
        self.controller.stop()
    }

    pub fn set_model(&mut self, model: FaceModel) {
        self.config.model = model;
        log::info!("Model set to {model}");
    }

    pub fn set_metric(&mut self, metric: DistanceMetric) {
        self.config.metric = metric;
        log::info!("Metric set to {metric}");
    }

    /// Applies one command, logging its failure.
    pub fn apply(&mut self, command: Command) -> ControlFlow<()> {
        log::debug!("Command {command:?}");
        let result = match command {
            Command::SwitchSource(source) => {
                self.switch_source(source);
                Ok(())
            }
            Command::LoadImage(path) => self.load_image(&path),
            Command::Capture => self.capture(),
            Command::Detect => self.detect().map(|_| ()),
            Command::Select(index) => self.select(index).map(|_| ()),
            Command::StartTracking => self.start_tracking(),
            Command::StopTracking => {
                self.stop_tracking();
                Ok(())
            }
            Command::SetModel(model) => {
                self.set_model(model);
                Ok(())
            }
            Command::SetMetric(metric) => {
                self.set_metric(metric);
                Ok(())
            }
            Command::Quit => {
                self.stop_tracking();
                return ControlFlow::Break(());
            }
        };
        if let Err(e) = result {
            log::warn!("{e}");
        }
        ControlFlow::Continue(())
    }

    /// Applies every command already queued, without blocking.
    fn drain(&mut self, commands: &Receiver<Command>) -> ControlFlow<()> {
        loop {
            match commands.try_recv() {
                Ok(command) => {
                    if self.apply(command).is_break() {
                        return ControlFlow::Break(());
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {
                    return ControlFlow::Continue(())
                }
            }
        }
    }

    /// Runs one tracking cycle. Commands that arrive during the match call
    /// are applied before its response is rendered.
    pub fn tracking_cycle(&mut self, commands: &Receiver<Command>) -> ControlFlow<()> {
        let source = match self.source.as_deref_mut() {
            Some(s) if s.is_live() => s,
            _ => {
                self.logger.info("Live source ended; tracking stopped");
                self.controller.stop();
                return ControlFlow::Continue(());
            }
        };

        let t0 = Instant::now();
        let pending = match self.controller.begin_cycle(source, &self.config) {
            Ok(pending) => pending,
            Err(FaceTrackError::Capture(e)) => {
                self.logger.info(&format!("Capture failed ({e}); tracking stopped"));
                self.controller.stop();
                return ControlFlow::Continue(());
            }
            Err(e) => {
                log::warn!("{e}");
                return ControlFlow::Continue(());
            }
        };
        self.logger
            .timing("capture", t0.elapsed().as_secs_f64() * 1000.0);

        let t0 = Instant::now();
        let result = self.matcher.match_faces(pending.request());
        self.logger
            .timing("match", t0.elapsed().as_secs_f64() * 1000.0);

        let flow = self.drain(commands);

        let t0 = Instant::now();
        let outcome = self
            .controller
            .complete_cycle(pending, result, self.surface.as_mut());
        match outcome {
            CycleOutcome::Rendered { drawn } => {
                self.logger
                    .timing("render", t0.elapsed().as_secs_f64() * 1000.0);
                self.logger.metric("verified_entries", drawn as f64);
            }
            CycleOutcome::NoMatch => self.logger.metric("verified_entries", 0.0),
            CycleOutcome::Failed(_) | CycleOutcome::Discarded => {}
        }
        if outcome != CycleOutcome::Discarded {
            self.logger.cycle(self.controller.completed_cycles());
        }
        flow
    }

    /// Drives the session until `Quit`, or until the channel disconnects
    /// while idle.
    ///
    /// Tracking cycles run back to back; a new request is only sent once
    /// the previous response has been handled.
    pub fn run(&mut self, commands: Receiver<Command>) {
        loop {
            let flow = if self.controller.is_active() {
                match self.drain(&commands) {
                    ControlFlow::Continue(()) if self.controller.is_active() => {
                        self.tracking_cycle(&commands)
                    }
                    flow => flow,
                }
            } else {
                match commands.recv() {
                    Ok(command) => self.apply(command),
                    Err(_) => ControlFlow::Break(()),
                }
            };
            if flow.is_break() {
                break;
            }
        }
        self.controller.stop();
        self.logger.summary();
    }
}
