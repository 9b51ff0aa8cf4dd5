//! Product Comparison — the single request/response pipeline.
//!
//! Flow: validate request → canonical query → cache lookup (per variant) →
//!       catalog fetch → prompt build → model call → normalize/validate →
//!       cache store → respond.
//!
//! The seven prompt variants differ only in template text, message shape,
//! model id and caching behavior — all expressed as a `VariantSpec`
//! descriptor, never as duplicated orchestration logic.

pub mod builder;
pub mod cache;
pub mod catalog;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod variant;
