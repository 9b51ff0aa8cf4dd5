//! Prompt Builder — renders a variant's template into either a flat prompt
//! string or a system/user message pair, with the product list and catalog
//! rows serialized as embedded JSON.

use anyhow::anyhow;

use crate::comparison::prompts::{
    canva_example, multi_shot_examples, CHAIN_OF_THOUGHT_PROMPT_TEMPLATE, CHAIN_OF_THOUGHT_SYSTEM,
    MULTI_SHOT_PROMPT_TEMPLATE, ONE_SHOT_PROMPT_TEMPLATE, STRUCTURED_OUTPUT_PROMPT_TEMPLATE,
    STRUCTURED_OUTPUT_SYSTEM, SYSTEM_USER_PROMPT_TEMPLATE, SYSTEM_USER_SYSTEM,
    TEMPERATURE_PROMPT_TEMPLATE, ZERO_SHOT_PROMPT_TEMPLATE,
};
use crate::comparison::variant::{PromptShape, Variant};
use crate::errors::AppError;
use crate::llm_client::{ChatMessage, PromptPayload};
use crate::models::catalog::ToolRow;

/// Builds the prompt payload for one variant. The variant descriptor decides
/// the payload shape; the per-variant match below only fills templates.
/// Catalog emptiness is fine: the data section then embeds `[]` and the
/// model works from names alone.
pub fn build_prompt(
    variant: Variant,
    products: &[String],
    tools: &[ToolRow],
) -> Result<PromptPayload, AppError> {
    let products_json = serde_json::to_string(products)
        .map_err(|e| AppError::Internal(anyhow!("Failed to serialize products: {e}")))?;
    let tools_json = serde_json::to_string(tools)
        .map_err(|e| AppError::Internal(anyhow!("Failed to serialize catalog data: {e}")))?;

    let text = task_text(variant, products, &products_json, &tools_json);

    let payload = match variant.spec().shape {
        PromptShape::Single => PromptPayload::Single(text),
        PromptShape::Chat => {
            let mut messages = Vec::new();
            if let Some(system) = system_prompt(variant) {
                messages.push(ChatMessage::System(system.to_string()));
            }
            messages.push(ChatMessage::User(text));
            PromptPayload::Chat(messages)
        }
    };

    Ok(payload)
}

/// The system message fixing persona and output contract; only the
/// role-separated variants carry one.
fn system_prompt(variant: Variant) -> Option<&'static str> {
    match variant {
        Variant::SystemUser => Some(SYSTEM_USER_SYSTEM),
        Variant::ChainOfThought => Some(CHAIN_OF_THOUGHT_SYSTEM),
        Variant::StructuredOutput => Some(STRUCTURED_OUTPUT_SYSTEM),
        _ => None,
    }
}

/// Fills the variant's task template with the serialized data.
fn task_text(
    variant: Variant,
    products: &[String],
    products_json: &str,
    tools_json: &str,
) -> String {
    match variant {
        Variant::ZeroShot => ZERO_SHOT_PROMPT_TEMPLATE
            // zero-shot lists names plainly rather than as a JSON array
            .replace("{products}", &products.join(", "))
            .replace("{tools_json}", tools_json),
        Variant::OneShot => {
            let example = canva_example();
            ONE_SHOT_PROMPT_TEMPLATE
                .replace("{example_input}", &example.input.to_string())
                .replace("{example_output}", &example.output.to_string())
                .replace("{products}", products_json)
                .replace("{tools_json}", tools_json)
        }
        Variant::MultiShot => {
            let examples = multi_shot_examples()
                .iter()
                .map(|e| format!("Input: {}\nOutput: {}", e.input, e.output))
                .collect::<Vec<_>>()
                .join("\n\n");
            MULTI_SHOT_PROMPT_TEMPLATE
                .replace("{examples}", &examples)
                .replace("{products}", products_json)
                .replace("{tools_json}", tools_json)
        }
        Variant::SystemUser => SYSTEM_USER_PROMPT_TEMPLATE
            .replace("{products}", products_json)
            .replace("{tools_json}", tools_json),
        Variant::ChainOfThought => CHAIN_OF_THOUGHT_PROMPT_TEMPLATE
            .replace("{products}", products_json)
            .replace("{tools_json}", tools_json),
        Variant::StructuredOutput => STRUCTURED_OUTPUT_PROMPT_TEMPLATE
            .replace("{products}", products_json)
            .replace("{tools_json}", tools_json),
        Variant::Temperature => TEMPERATURE_PROMPT_TEMPLATE
            .replace("{products}", products_json)
            .replace("{tools_json}", tools_json),
    }
}
