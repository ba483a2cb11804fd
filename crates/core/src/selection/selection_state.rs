use crate::detection::domain::detected_face::DetectedFace;

/// The pinned face and the candidates of the latest detection.
///
/// Owned by [`crate::tracking::tracking_controller::TrackingController`],
/// which stops tracking before every mutation.
#[derive(Debug, Default)]
pub struct SelectionState {
    active_face: Option<DetectedFace>,
    candidates: Vec<DetectedFace>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_face(&self) -> Option<&DetectedFace> {
        self.active_face.as_ref()
    }

    pub fn candidates(&self) -> &[DetectedFace] {
        &self.candidates
    }

    /// Pins `face` without checking it against the candidates.
    pub fn select(&mut self, face: DetectedFace) {
        self.active_face = Some(face);
    }

    /// Pins the candidate at `index`, if there is one.
    pub fn select_index(&mut self, index: usize) -> Option<&DetectedFace> {
        let face = self.candidates.get(index)?.clone();
        self.active_face = Some(face);
        self.active_face.as_ref()
    }

    /// Replaces the candidates with a new detection batch and pins the
    /// first face, dropping any previous pin.
    pub fn replace_candidates(&mut self, faces: Vec<DetectedFace>) {
        self.active_face = faces.first().cloned();
        self.candidates = faces;
    }

    pub fn reset(&mut self) {
        self.active_face = None;
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;

    fn face(index: usize) -> DetectedFace {
        DetectedFace::new(
            index,
            BoundingBox::new(index as i32 * 10, 0, 8, 8),
            vec![index as f64],
        )
    }

    #[test]
    fn test_new_is_empty() {
        let state = SelectionState::new();
        assert!(state.active_face().is_none());
        assert!(state.candidates().is_empty());
    }

    #[test]
    fn test_replace_pins_first_candidate() {
        let mut state = SelectionState::new();
        state.replace_candidates(vec![face(0), face(1)]);
        assert_eq!(state.active_face().unwrap().id(), face(0).id());
        assert_eq!(state.candidates().len(), 2);
    }

    #[test]
    fn test_replace_with_empty_clears_pin() {
        let mut state = SelectionState::new();
        state.replace_candidates(vec![face(0)]);
        state.replace_candidates(vec![]);
        assert!(state.active_face().is_none());
        assert!(state.candidates().is_empty());
    }

    #[test]
    fn test_select_index_repins() {
        let mut state = SelectionState::new();
        state.replace_candidates(vec![face(0), face(1), face(2)]);

        let picked = state.select_index(2).unwrap().id().to_string();

        assert_eq!(picked, face(2).id());
        assert_eq!(state.active_face().unwrap().id(), face(2).id());
    }

    #[test]
    fn test_select_index_out_of_range_keeps_pin() {
        let mut state = SelectionState::new();
        state.replace_candidates(vec![face(0)]);
        assert!(state.select_index(5).is_none());
        assert_eq!(state.active_face().unwrap().id(), face(0).id());
    }

    #[test]
    fn test_select_is_not_validated_against_candidates() {
        let mut state = SelectionState::new();
        state.replace_candidates(vec![face(0)]);
        let stale = face(7);

        state.select(stale.clone());

        assert_eq!(state.active_face(), Some(&stale));
        assert!(!state.candidates().contains(&stale));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = SelectionState::new();
        state.replace_candidates(vec![face(0), face(1)]);
        state.select(face(9));

        state.reset();

        assert!(state.active_face().is_none());
        assert!(state.candidates().is_empty());
    }
}
