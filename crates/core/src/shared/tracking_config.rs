use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Embedding models the remote services know how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FaceModel {
    #[serde(rename = "VGG-Face")]
    VggFace,
    #[serde(rename = "Facenet")]
    Facenet,
    #[default]
    #[serde(rename = "Facenet512")]
    Facenet512,
    #[serde(rename = "OpenFace")]
    OpenFace,
    #[serde(rename = "DeepFace")]
    DeepFace,
    #[serde(rename = "DeepID")]
    DeepId,
    #[serde(rename = "Dlib")]
    Dlib,
    #[serde(rename = "ArcFace")]
    ArcFace,
    #[serde(rename = "SFace")]
    SFace,
}

impl FaceModel {
    pub const ALL: &[FaceModel] = &[
        FaceModel::VggFace,
        FaceModel::Facenet,
        FaceModel::Facenet512,
        FaceModel::OpenFace,
        FaceModel::DeepFace,
        FaceModel::DeepId,
        FaceModel::Dlib,
        FaceModel::ArcFace,
        FaceModel::SFace,
    ];

    /// Name sent in the `model` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            FaceModel::VggFace => "VGG-Face",
            FaceModel::Facenet => "Facenet",
            FaceModel::Facenet512 => "Facenet512",
            FaceModel::OpenFace => "OpenFace",
            FaceModel::DeepFace => "DeepFace",
            FaceModel::DeepId => "DeepID",
            FaceModel::Dlib => "Dlib",
            FaceModel::ArcFace => "ArcFace",
            FaceModel::SFace => "SFace",
        }
    }
}

impl fmt::Display for FaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaceModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaceModel::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown model '{s}', expected one of: {}", names(FaceModel::ALL)))
    }
}

/// Distance metrics the matching service can verify with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
    #[default]
    #[serde(rename = "euclidean_l2")]
    EuclideanL2,
}

impl DistanceMetric {
    pub const ALL: &[DistanceMetric] = &[
        DistanceMetric::Cosine,
        DistanceMetric::Euclidean,
        DistanceMetric::EuclideanL2,
    ];

    /// Name sent in the `metric` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::EuclideanL2 => "euclidean_l2",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistanceMetric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown metric '{s}', expected one of: {}",
                    names(DistanceMetric::ALL)
                )
            })
    }
}

fn names<T: fmt::Display>(all: &[T]) -> String {
    all.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Model and metric used by the next detection or matching call.
///
/// Passed by value into every call; changing it never re-evaluates
/// embeddings that were already produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackingConfig {
    pub model: FaceModel,
    pub metric: DistanceMetric,
}

impl TrackingConfig {
    pub fn new(model: FaceModel, metric: DistanceMetric) -> Self {
        Self { model, metric }
    }
}
