//! Comparison Pipeline — the single externally visible operation.
//!
//! Linear, terminal on first response or first error: validate → canonical
//! query → cache lookup (variant-dependent) → catalog fetch → prompt build →
//! model call → normalize → cache store → respond. No retries, no partial
//! results. One cache write per successful uncached call; zero writes on any
//! failure path.
//!
//! Two concurrent requests for the same canonical query can both miss the
//! cache and both generate and store. There is no per-key in-flight lock;
//! that gap is inherited from the source and left open on purpose.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::comparison::builder::build_prompt;
use crate::comparison::cache::ComparisonCache;
use crate::comparison::catalog::CatalogStore;
use crate::comparison::normalize::normalize;
use crate::comparison::variant::{Variant, DEFAULT_TEMPERATURE};
use crate::errors::AppError;
use crate::llm_client::ModelGateway;

/// Separator joining product names into the cache key. Order-sensitive:
/// "A vs B" and "B vs A" are distinct keys.
const QUERY_SEPARATOR: &str = " vs ";

/// Request body shared by all seven compare endpoints.
///
/// `products` defaults to empty when the field is absent, so a body like
/// `{"userId": "u"}` reaches the pipeline and gets the same 400 as an
/// explicit short list instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Derives the cache key from the requested product list.
pub fn canonical_query(products: &[String]) -> String {
    products.join(QUERY_SEPARATOR)
}

/// The orchestrator. Stores, catalog and gateway are injected as trait
/// objects so tests can substitute counting mocks.
pub struct ComparisonPipeline {
    catalog: Arc<dyn CatalogStore>,
    cache: Arc<dyn ComparisonCache>,
    gateway: Arc<dyn ModelGateway>,
}

impl ComparisonPipeline {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        cache: Arc<dyn ComparisonCache>,
        gateway: Arc<dyn ModelGateway>,
    ) -> Self {
        Self {
            catalog,
            cache,
            gateway,
        }
    }

    /// Runs one comparison end to end and returns the result payload.
    ///
    /// The return type is `Value` rather than `ComparisonResult` so a cache
    /// hit returns the stored payload byte-for-byte as persisted.
    pub async fn run(&self, variant: Variant, request: &CompareRequest) -> Result<Value, AppError> {
        // Synchronous validation before any I/O.
        if request.products.len() < 2 {
            return Err(AppError::Validation(
                "Provide at least two products".to_string(),
            ));
        }

        let spec = variant.spec();
        let key = canonical_query(&request.products);

        if spec.cache_lookup {
            if let Some(cached) = self.cache.lookup(&key).await? {
                info!("Cache hit for '{key}' ({})", variant.as_str());
                return Ok(cached.result);
            }
        }

        // Missing catalog entries are not an error; the prompt then embeds
        // an empty data section.
        let tools = self.catalog.fetch_by_names(&request.products).await?;
        info!(
            "Comparing {} products ({} catalog entries, variant {})",
            request.products.len(),
            tools.len(),
            variant.as_str()
        );

        let payload = build_prompt(variant, &request.products, &tools)?;

        let temperature = spec
            .forwards_temperature
            .then(|| request.temperature.unwrap_or(DEFAULT_TEMPERATURE));

        let raw_text = self
            .gateway
            .complete(spec.model, &payload, temperature)
            .await
            .map_err(|e| AppError::Llm(format!("Comparison LLM call failed: {e}")))?;

        let result = normalize(&raw_text, spec.brace_slice, &request.products)
            .map_err(|e| AppError::InvalidModelOutput(e.to_string()))?;

        let value = serde_json::to_value(&result)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize result: {e}")))?;

        self.cache
            .store(
                &key,
                request.user_id.as_deref(),
                &value,
                &request.products,
            )
            .await?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::llm_client::{LlmError, PromptPayload};
    use crate::models::catalog::ToolRow;
    use crate::models::comparison::CachedComparisonRow;

    // ── Mocks ───────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct MockCatalog {
        rows: Vec<ToolRow>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogStore for MockCatalog {
        async fn fetch_by_names(&self, _names: &[String]) -> Result<Vec<ToolRow>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.clone())
        }
    }

    #[derive(Default)]
    struct MockCache {
        prepopulated: Option<CachedComparisonRow>,
        lookups: AtomicUsize,
        stores: Mutex<Vec<(String, Option<String>, Value, Vec<String>)>>,
    }

    #[async_trait]
    impl ComparisonCache for MockCache {
        async fn lookup(
            &self,
            canonical_query: &str,
        ) -> Result<Option<CachedComparisonRow>, sqlx::Error> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .prepopulated
                .clone()
                .filter(|row| row.canonical_query == canonical_query))
        }

        async fn store(
            &self,
            canonical_query: &str,
            requester_id: Option<&str>,
            result: &Value,
            tool_names: &[String],
        ) -> Result<(), sqlx::Error> {
            self.stores.lock().unwrap().push((
                canonical_query.to_string(),
                requester_id.map(str::to_string),
                result.clone(),
                tool_names.to_vec(),
            ));
            Ok(())
        }
    }

    struct MockGateway {
        response: Result<String, ()>,
        calls: AtomicUsize,
        last_model: Mutex<Option<String>>,
        last_temperature: Mutex<Option<Option<f64>>>,
    }

    impl MockGateway {
        fn returning(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_model: Mutex::new(None),
                last_temperature: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(()),
                calls: AtomicUsize::new(0),
                last_model: Mutex::new(None),
                last_temperature: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ModelGateway for MockGateway {
        async fn complete(
            &self,
            model: &str,
            _payload: &PromptPayload,
            temperature: Option<f64>,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_model.lock().unwrap() = Some(model.to_string());
            *self.last_temperature.lock().unwrap() = Some(temperature);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(LlmError::Api {
                    status: 503,
                    message: "model overloaded".to_string(),
                }),
            }
        }
    }

    // ── Fixtures ────────────────────────────────────────────────────────────

    fn products() -> Vec<String> {
        vec!["Canva Free".to_string(), "Canva Pro".to_string()]
    }

    fn request() -> CompareRequest {
        CompareRequest {
            products: products(),
            user_id: Some("user-1".to_string()),
            temperature: None,
        }
    }

    fn model_json() -> Value {
        json!({
            "products": ["Canva Free", "Canva Pro"],
            "comparison": [
                {
                    "feature": "Storage",
                    "details": {"Canva Free": "5GB", "Canva Pro": "1TB"},
                    "diff": "Pro has 200x more storage"
                }
            ],
            "recommendation": "Canva Pro for teams."
        })
    }

    fn fenced_model_text() -> String {
        format!("```json\n{}\n```", model_json())
    }

    fn cached_row(key: &str, result: Value) -> CachedComparisonRow {
        CachedComparisonRow {
            id: Uuid::new_v4(),
            canonical_query: key.to_string(),
            requester_id: None,
            result,
            tool_names: products(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tool_row(name: &str) -> ToolRow {
        ToolRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            plans: sqlx::types::Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Harness {
        catalog: Arc<MockCatalog>,
        cache: Arc<MockCache>,
        gateway: Arc<MockGateway>,
        pipeline: ComparisonPipeline,
    }

    fn harness(catalog: MockCatalog, cache: MockCache, gateway: MockGateway) -> Harness {
        let catalog = Arc::new(catalog);
        let cache = Arc::new(cache);
        let gateway = Arc::new(gateway);
        let pipeline = ComparisonPipeline::new(
            catalog.clone(),
            cache.clone(),
            gateway.clone(),
        );
        Harness {
            catalog,
            cache,
            gateway,
            pipeline,
        }
    }

    // ── Tests ───────────────────────────────────────────────────────────────

    #[test]
    fn test_canonical_query_is_order_sensitive() {
        let forward = canonical_query(&products());
        assert_eq!(forward, "Canva Free vs Canva Pro");

        let mut reversed = products();
        reversed.reverse();
        assert_eq!(canonical_query(&reversed), "Canva Pro vs Canva Free");
        assert_ne!(forward, canonical_query(&reversed));
    }

    #[tokio::test]
    async fn test_fewer_than_two_products_fails_before_any_io() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning("unused"),
        );
        let req = CompareRequest {
            products: vec!["X".to_string()],
            user_id: None,
            temperature: None,
        };

        let err = h.pipeline.run(Variant::ZeroShot, &req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Provide at least two products"));

        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.cache.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 0);
        assert!(h.cache.stores.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_products_field_gets_the_same_400() {
        // `{"userId": "u"}` must deserialize (empty product list) and then
        // fail the same pre-I/O validation as an explicit short list.
        let req: CompareRequest = serde_json::from_str(r#"{"userId": "user-1"}"#).unwrap();
        assert!(req.products.is_empty());
        assert_eq!(req.user_id.as_deref(), Some("user-1"));

        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning("unused"),
        );
        let err = h.pipeline.run(Variant::StructuredOutput, &req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Provide at least two products"));
        assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_returns_stored_result_without_model_call() {
        let key = canonical_query(&products());
        let stored = model_json();
        let h = harness(
            MockCatalog::default(),
            MockCache {
                prepopulated: Some(cached_row(&key, stored.clone())),
                ..Default::default()
            },
            MockGateway::returning("unused"),
        );

        let value = h
            .pipeline
            .run(Variant::StructuredOutput, &request())
            .await
            .unwrap();

        assert_eq!(value, stored);
        assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 0);
        assert!(h.cache.stores.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_disabled_variant_regenerates_despite_cached_row() {
        let key = canonical_query(&products());
        let h = harness(
            MockCatalog::default(),
            MockCache {
                prepopulated: Some(cached_row(&key, model_json())),
                ..Default::default()
            },
            MockGateway::returning(&fenced_model_text()),
        );

        h.pipeline.run(Variant::OneShot, &request()).await.unwrap();

        // The prepopulated row is never consulted and a fresh row is written.
        assert_eq!(h.cache.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.cache.stores.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_run_stores_under_canonical_key() {
        let h = harness(
            MockCatalog {
                rows: vec![tool_row("Canva Free"), tool_row("Canva Pro")],
                ..Default::default()
            },
            MockCache::default(),
            MockGateway::returning(&fenced_model_text()),
        );

        let value = h
            .pipeline
            .run(Variant::MultiShot, &request())
            .await
            .unwrap();
        assert_eq!(value, model_json());

        let stores = h.cache.stores.lock().unwrap();
        assert_eq!(stores.len(), 1);
        let (key, requester, stored_value, tool_names) = &stores[0];
        assert_eq!(key, "Canva Free vs Canva Pro");
        assert_eq!(requester.as_deref(), Some("user-1"));
        assert_eq!(stored_value, &value);
        assert_eq!(tool_names, &products());
    }

    #[tokio::test]
    async fn test_invalid_model_output_reports_500_and_writes_nothing() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning("here is my answer, hope it helps!"),
        );

        let err = h
            .pipeline
            .run(Variant::StructuredOutput, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidModelOutput(_)));
        assert!(h.cache.stores.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_propagates_and_writes_nothing() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::failing(),
        );

        let err = h.pipeline.run(Variant::ZeroShot, &request()).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert!(h.cache.stores.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog_still_calls_model() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning(&fenced_model_text()),
        );

        let value = h.pipeline.run(Variant::ZeroShot, &request()).await.unwrap();
        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(value, model_json());
    }

    #[tokio::test]
    async fn test_chain_of_thought_extracts_json_from_reasoning() {
        let raw = format!(
            "Step 1: storage differs.\nStep 2: pricing differs.\n\n{}\n",
            model_json()
        );
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning(&raw),
        );

        let value = h
            .pipeline
            .run(Variant::ChainOfThought, &request())
            .await
            .unwrap();
        assert_eq!(value, model_json());
    }

    #[tokio::test]
    async fn test_temperature_variant_defaults_to_0_7() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning(&fenced_model_text()),
        );

        h.pipeline.run(Variant::Temperature, &request()).await.unwrap();
        let forwarded = h.gateway.last_temperature.lock().unwrap().unwrap();
        assert_eq!(forwarded, Some(DEFAULT_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_temperature_forwarded_verbatim_without_range_check() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning(&fenced_model_text()),
        );
        let mut req = request();
        req.temperature = Some(42.0); // unbounded by contract

        h.pipeline.run(Variant::Temperature, &req).await.unwrap();
        let forwarded = h.gateway.last_temperature.lock().unwrap().unwrap();
        assert_eq!(forwarded, Some(42.0));
    }

    #[tokio::test]
    async fn test_non_temperature_variants_forward_no_temperature() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning(&fenced_model_text()),
        );
        let mut req = request();
        req.temperature = Some(1.5);

        h.pipeline.run(Variant::MultiShot, &req).await.unwrap();
        let forwarded = h.gateway.last_temperature.lock().unwrap().unwrap();
        assert_eq!(forwarded, None);
    }

    #[tokio::test]
    async fn test_chat_variant_uses_chat_model() {
        let h = harness(
            MockCatalog::default(),
            MockCache::default(),
            MockGateway::returning(&fenced_model_text()),
        );

        h.pipeline.run(Variant::SystemUser, &request()).await.unwrap();
        let model = h.gateway.last_model.lock().unwrap().clone().unwrap();
        assert_eq!(model, crate::llm_client::MODEL_CHAT);
    }
}
