//! Relevance filtering and ranking of raw store matches

use serde_json::Value;
use tracing::debug;
use tracing::warn;

use super::DocumentMetadata;
use super::RetrievedDocument;

/// Matches at or beyond this distance are dropped.
///
/// The meaning of the number depends on the store's distance metric; the
/// runtime value comes from `retrieval.distance_threshold`.
pub const RELEVANCE_DISTANCE_THRESHOLD: f64 = 2.0;

/// Build a ranked result set from the three parallel columns a query returns.
///
/// Keeps a match iff its distance is strictly below `threshold`, then sorts
/// survivors ascending by distance. The sort is stable, so equal distances
/// keep their store order. Null documents and null or NaN distances are
/// dropped; a null metadata entry becomes the default metadata.
pub fn filter_and_rank(
    documents: Vec<Option<String>>,
    metadatas: Vec<Option<Value>>,
    distances: Vec<Option<f64>>,
    threshold: f64,
) -> Vec<RetrievedDocument> {
    if documents.len() != metadatas.len() || documents.len() != distances.len() {
        warn!(
            documents = documents.len(),
            metadatas = metadatas.len(),
            distances = distances.len(),
            "RAG: column lengths differ, truncating to the shortest"
        );
    }

    let mut relevant: Vec<RetrievedDocument> = documents
        .into_iter()
        .zip(metadatas)
        .zip(distances)
        .filter_map(|((document, metadata), distance)| {
            let content = document?;
            let distance = distance?;
            if distance.is_nan() || distance >= threshold {
                debug!(distance, threshold, "RAG: dropping low-relevance match");
                return None;
            }
            Some(RetrievedDocument {
                content,
                metadata: parse_metadata(metadata),
                distance,
            })
        })
        .collect();

    sort_by_distance(&mut relevant);
    relevant
}

fn sort_by_distance(documents: &mut [RetrievedDocument]) {
    // slice::sort_by is stable
    documents.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

fn parse_metadata(metadata: Option<Value>) -> DocumentMetadata {
    match metadata {
        None | Some(Value::Null) => DocumentMetadata::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("RAG: unreadable document metadata, using defaults: {}", e);
            DocumentMetadata::default()
        }),
    }
}
