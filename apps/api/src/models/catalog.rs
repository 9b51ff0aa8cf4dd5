use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One pricing plan of a catalog product: plan name, price, and a
/// feature-name → feature-value mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingPlan {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub features: BTreeMap<String, String>,
}

/// A product record from the `tools` catalog table.
///
/// The catalog is written by an external management process; this service
/// only ever reads it. `name` is the unique lookup key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToolRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub plans: Json<Vec<PricingPlan>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
