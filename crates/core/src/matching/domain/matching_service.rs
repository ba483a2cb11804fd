use serde::Deserialize;

use crate::service::service_error::ServiceError;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::lenient::{list_or_empty, number_or_none};
use crate::shared::tracking_config::{DistanceMetric, FaceModel};

/// Everything one tracking cycle submits.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchRequest {
    pub image_png: Vec<u8>,
    pub embedding: String,
    pub model: FaceModel,
    pub metric: DistanceMetric,
}

/// Per-entry verdict of the matching service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct MatchResult {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Raw matching result: boxes and verdicts as parallel arrays.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchResponse {
    #[serde(deserialize_with = "list_or_empty")]
    pub entries: Vec<BoundingBox>,
    #[serde(deserialize_with = "list_or_empty")]
    pub results: Vec<MatchResult>,
    #[serde(deserialize_with = "number_or_none")]
    pub threshold: Option<f64>,
}

/// A face found in a tracked frame, paired with its verdict.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchEntry {
    pub bounding_box: BoundingBox,
    pub verified: bool,
    pub distance: Option<f64>,
}

impl MatchResponse {
    /// Pairs entry `i` with result `i`.
    ///
    /// Arrays of different lengths are malformed and yield no entries.
    pub fn entries(&self) -> Vec<MatchEntry> {
        if self.entries.len() != self.results.len() {
            log::warn!(
                "Malformed match response: {} entries but {} results; ignoring",
                self.entries.len(),
                self.results.len()
            );
            return Vec::new();
        }
        self.entries
            .iter()
            .zip(&self.results)
            .map(|(bbox, result)| MatchEntry {
                bounding_box: *bbox,
                verified: result.verified,
                distance: result.distance,
            })
            .collect()
    }

    pub fn verified_entries(&self) -> Vec<MatchEntry> {
        self.entries().into_iter().filter(|e| e.verified).collect()
    }
}

/// Remote face verification endpoint.
pub trait MatchingService: Send {
    fn match_faces(&self, request: &MatchRequest) -> Result<MatchResponse, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_verified_entries_filters_unverified() {
        let response = MatchResponse {
            entries: vec![BoundingBox::new(1, 1, 5, 5), BoundingBox::new(20, 20, 5, 5)],
            results: vec![
                MatchResult {
                    verified: false,
                    distance: Some(1.2),
                },
                MatchResult {
                    verified: true,
                    distance: Some(0.3),
                },
            ],
            threshold: Some(1.04),
        };

        let verified = response.verified_entries();

        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].bounding_box, BoundingBox::new(20, 20, 5, 5));
        assert_relative_eq!(verified[0].distance.unwrap(), 0.3);
    }

    #[test]
    fn test_mismatched_lengths_yield_nothing() {
        let response = MatchResponse {
            entries: vec![BoundingBox::new(1, 1, 5, 5)],
            results: vec![],
            threshold: None,
        };
        assert!(response.entries().is_empty());
        assert!(response.verified_entries().is_empty());
    }

    #[test]
    fn test_deserialize_full_service_body() {
        let body = r#"{
            "entries": [{"x": 1, "y": 1, "width": 5, "height": 5}],
            "embeddings": [[0.1, 0.2]],
            "results": [{"verified": true, "distance": 0.25}],
            "threshold": 0.8,
            "model": "Facenet512",
            "metric": "euclidean_l2"
        }"#;

        let response: MatchResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.entries.len(), 1);
        assert!(response.results[0].verified);
        assert_eq!(response.threshold, Some(0.8));
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let response: MatchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.entries().is_empty());
    }

    #[rstest::rstest]
    #[case::missing_width(r#"{"entries": [{"x": 1, "y": 1, "height": 5}], "results": [{"verified": true}]}"#)]
    #[case::fractional_x(
        r#"{"entries": [{"x": 1.5, "y": 1, "width": 5, "height": 5}], "results": [{"verified": true}]}"#
    )]
    #[case::bad_verdict(
        r#"{"entries": [{"x": 1, "y": 1, "width": 5, "height": 5}], "results": [{"verified": "yes"}]}"#
    )]
    fn test_malformed_element_yields_nothing(#[case] body: &str) {
        let response: MatchResponse = serde_json::from_str(body).unwrap();
        assert!(response.verified_entries().is_empty());
    }
}
