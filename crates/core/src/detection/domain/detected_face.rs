use std::sync::Arc;

use crate::shared::bounding_box::BoundingBox;

/// One face from a detection batch: where it is and what it looks like.
///
/// The embedding is produced remotely and shared immutably; clones of a
/// face point at the same vector.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedFace {
    id: String,
    bounding_box: BoundingBox,
    embedding: Arc<[f64]>,
    embedding_serialized: Arc<str>,
}

impl DetectedFace {
    /// Builds the `index`-th face of a batch.
    pub fn new(index: usize, bounding_box: BoundingBox, embedding: Vec<f64>) -> Self {
        let embedding_serialized = serialize_embedding(&embedding);
        Self {
            id: bounding_box.face_id(index),
            bounding_box,
            embedding: embedding.into(),
            embedding_serialized: embedding_serialized.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn embedding(&self) -> &[f64] {
        &self.embedding
    }

    /// Comma-separated embedding, as the matching service's `embedding`
    /// form field expects it.
    pub fn embedding_serialized(&self) -> &str {
        &self.embedding_serialized
    }
}

/// Comma-joined shortest round-trip decimal form, no brackets.
pub fn serialize_embedding(embedding: &[f64]) -> String {
    embedding
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
