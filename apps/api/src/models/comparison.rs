use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One feature row of a comparison: the feature name, a per-product value
/// mapping, and an optional difference summary (the zero-shot variant asks
/// the model to omit `diff`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeatureComparison {
    pub feature: String,
    pub details: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// The structured payload returned to callers and persisted in the cache.
///
/// Deserialization is strict (`deny_unknown_fields`): a model response with
/// extra top-level fields is a shape violation, reported separately from a
/// JSON parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComparisonResult {
    pub products: Vec<String>,
    pub comparison: Vec<FeatureComparison>,
    pub recommendation: String,
}

/// A previously computed comparison from the `queries` table.
///
/// Rows are insert-only: nothing in this service updates or deletes them,
/// and `canonical_query` carries no uniqueness constraint, so a repeated
/// store produces a second independent row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CachedComparisonRow {
    pub id: Uuid,
    pub canonical_query: String,
    pub requester_id: Option<String>,
    pub result: Value,
    pub tool_names: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
