use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::detected_face::DetectedFace;
use crate::matching::domain::matching_service::{MatchRequest, MatchResponse, MatchingService};
use crate::rendering::domain::render_surface::RenderSurface;
use crate::rendering::render_coordinator::RenderCoordinator;
use crate::selection::selection_state::SelectionState;
use crate::service::service_error::ServiceError;
use crate::shared::error::FaceTrackError;
use crate::shared::image_codec;
use crate::shared::tracking_config::TrackingConfig;
use crate::tracking::hidden_buffer::HiddenBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    Idle,
    Tracking,
}

/// A cycle whose match request has been built and may be in flight.
///
/// Hand it back to [`TrackingController::complete_cycle`] with the
/// service's answer.
#[derive(Debug)]
pub struct PendingCycle {
    session: u64,
    cycle: u64,
    request: MatchRequest,
}

impl PendingCycle {
    pub fn request(&self) -> &MatchRequest {
        &self.request
    }

    /// Tracking session the cycle belongs to.
    pub fn session(&self) -> u64 {
        self.session
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    /// The snapshot was painted with this many verified boxes.
    Rendered { drawn: usize },
    /// No verified entry; the surface was left as it was.
    NoMatch,
    /// The match call failed; reported and skipped.
    Failed(String),
    /// Tracking stopped (or restarted) while the request was in flight.
    Discarded,
}

/// Idle/Tracking state machine around the pinned face.
///
/// Owns the selection so that every change of pin or candidates forces the
/// loop back to Idle first. A cycle is split into [`begin_cycle`] (snapshot
/// and build the request) and [`complete_cycle`] (check the session is
/// still the same, then render); the network call happens in between and
/// is the only point where a stop can slip in.
///
/// [`begin_cycle`]: TrackingController::begin_cycle
/// [`complete_cycle`]: TrackingController::complete_cycle
pub struct TrackingController {
    state: TrackingState,
    selection: SelectionState,
    hidden: HiddenBuffer,
    coordinator: RenderCoordinator,
    session: u64,
    next_cycle: u64,
    in_flight: Option<u64>,
    completed: u64,
}

impl TrackingController {
    pub fn new(coordinator: RenderCoordinator) -> Self {
        Self {
            state: TrackingState::Idle,
            selection: SelectionState::new(),
            hidden: HiddenBuffer::new(),
            coordinator,
            session: 0,
            next_cycle: 0,
            in_flight: None,
            completed: 0,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TrackingState::Tracking
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn coordinator(&self) -> &RenderCoordinator {
        &self.coordinator
    }

    pub fn hidden_buffer(&self) -> &HiddenBuffer {
        &self.hidden
    }

    /// Cycles whose response was observed while still tracking.
    pub fn completed_cycles(&self) -> u64 {
        self.completed
    }

    /// Idle -> Tracking. Needs a pinned face and a live source.
    ///
    /// Starting while already tracking keeps the running session.
    pub fn start(&mut self, source_live: bool) -> Result<(), FaceTrackError> {
        let Some(face) = self.selection.active_face() else {
            return Err(FaceTrackError::NoActiveFace);
        };
        if !source_live {
            return Err(FaceTrackError::SourceNotLive);
        }
        if self.is_active() {
            return Ok(());
        }
        self.session += 1;
        self.state = TrackingState::Tracking;
        log::info!("Tracking face {} (session {})", face.id(), self.session);
        Ok(())
    }

    /// Tracking -> Idle. Returns whether tracking was running.
    ///
    /// A cycle already in flight is not interrupted; its response is
    /// discarded by [`TrackingController::complete_cycle`].
    pub fn stop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = TrackingState::Idle;
        self.in_flight = None;
        log::info!(
            "Tracking stopped (session {}, {} cycles)",
            self.session,
            self.completed
        );
        true
    }

    /// Pins `face` as is. Stops tracking.
    pub fn select(&mut self, face: DetectedFace) {
        self.stop();
        self.selection.select(face);
    }

    /// Pins the candidate at `index`. Stops tracking unless the index is
    /// out of range, in which case nothing changes.
    pub fn select_candidate(&mut self, index: usize) -> Result<&DetectedFace, FaceTrackError> {
        if index >= self.selection.candidates().len() {
            return Err(FaceTrackError::NoSuchCandidate(index));
        }
        self.stop();
        self.selection
            .select_index(index)
            .ok_or(FaceTrackError::NoSuchCandidate(index))
    }

    /// Installs a new detection batch, pinning its first face. Stops
    /// tracking.
    pub fn replace_candidates(&mut self, faces: Vec<DetectedFace>) {
        self.stop();
        self.selection.replace_candidates(faces);
    }

    /// Clears pin and candidates. Stops tracking first.
    pub fn reset_selection(&mut self) {
        self.stop();
        self.selection.reset();
    }

    /// Snapshots the source into the hidden buffer and builds the match
    /// request for the pinned face.
    ///
    /// Capture failures come back as [`FaceTrackError::Capture`]; an encode
    /// failure is a [`FaceTrackError::MatchFailed`] for this cycle only.
    pub fn begin_cycle(
        &mut self,
        source: &mut dyn FrameSource,
        config: &TrackingConfig,
    ) -> Result<PendingCycle, FaceTrackError> {
        if !self.is_active() {
            return Err(FaceTrackError::NotTracking);
        }
        let embedding = self
            .selection
            .active_face()
            .ok_or(FaceTrackError::NoActiveFace)?
            .embedding_serialized()
            .to_string();

        let snapshot = self.hidden.snapshot(source)?;
        let image_png = image_codec::encode_png(snapshot)
            .map_err(|e| FaceTrackError::MatchFailed(ServiceError::Encode(e)))?;

        let cycle = self.next_cycle;
        self.next_cycle += 1;
        self.in_flight = Some(cycle);
        Ok(PendingCycle {
            session: self.session,
            cycle,
            request: MatchRequest {
                image_png,
                embedding,
                model: config.model,
                metric: config.metric,
            },
        })
    }

    /// Applies a cycle's response, unless tracking stopped or moved on to
    /// another session since the cycle began.
    ///
    /// Only a response with at least one verified entry touches the
    /// surface: it repaints the hidden snapshot and boxes every verified
    /// entry.
    pub fn complete_cycle(
        &mut self,
        pending: PendingCycle,
        result: Result<MatchResponse, ServiceError>,
        surface: &mut dyn RenderSurface,
    ) -> CycleOutcome {
        if !self.is_active()
            || pending.session != self.session
            || self.in_flight != Some(pending.cycle)
        {
            log::debug!(
                "Discarding response of cycle {} (session {})",
                pending.cycle,
                pending.session
            );
            return CycleOutcome::Discarded;
        }
        self.in_flight = None;
        self.completed += 1;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let err = FaceTrackError::MatchFailed(e);
                log::warn!("{err}");
                return CycleOutcome::Failed(err.to_string());
            }
        };

        let verified = response.verified_entries();
        if verified.is_empty() {
            return CycleOutcome::NoMatch;
        }
        for entry in &verified {
            log::debug!(
                "Verified at {:?} (distance {:?}, threshold {:?})",
                entry.bounding_box,
                entry.distance,
                response.threshold
            );
        }
        let drawn = self
            .coordinator
            .draw_tracked_matches(surface, self.hidden.frame(), &verified);
        CycleOutcome::Rendered { drawn }
    }

    /// One full cycle with a blocking match call.
    pub fn run_cycle(
        &mut self,
        source: &mut dyn FrameSource,
        matcher: &dyn MatchingService,
        config: &TrackingConfig,
        surface: &mut dyn RenderSurface,
    ) -> Result<CycleOutcome, FaceTrackError> {
        let pending = self.begin_cycle(source, config)?;
        let result = matcher.match_faces(pending.request());
        Ok(self.complete_cycle(pending, result, surface))
    }
}

impl Default for TrackingController {
    fn default() -> Self {
        Self::new(RenderCoordinator::default())
    }
}
