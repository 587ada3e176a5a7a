use serde::{Deserialize, Serialize};

/// One indexed text segment. Immutable once uploaded; its lifetime is the
/// lifetime of the external index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedSegment {
    /// Opaque key, unique per segment (document name + position + random token).
    pub id: String,
    /// The segment's text content.
    pub content: String,
    /// Originating document name.
    pub source: String,
}

/// One scored segment returned by a text query.
#[derive(Debug, Clone)]
pub struct SegmentHit {
    pub content: String,
    pub source: String,
    pub score: f64,
}
