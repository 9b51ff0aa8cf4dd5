// All prompt constants for the comparison pipeline. One template per variant;
// the builder fills `{placeholders}` and serializes catalog data as embedded
// JSON — that is the only channel by which product data reaches the model.

use serde_json::{json, Value};

/// Zero-shot: simple short descriptions, explicitly no differences, no `diff`.
pub const ZERO_SHOT_PROMPT_TEMPLATE: &str = r#"Compare these products in a simple and basic way.
Just give a short description of each feature without going into details or differences.
Products: {products}
Data: {tools_json}
Return JSON in this format:
{
  "products": [...],
  "comparison": [{"feature": "", "details": {"Product1": "", "Product2": ""}}],
  "recommendation": "short text"
}"#;

/// One-shot: a single worked example embedded verbatim before the task.
/// Replace `{example_input}`, `{example_output}`, `{products}`, `{tools_json}`.
pub const ONE_SHOT_PROMPT_TEMPLATE: &str = r#"Here is an example comparison:
Input: {example_input}
Output: {example_output}

Now compare these products: {products}
Use this data: {tools_json}
Highlight key differences with a "diff" field for each feature.
Provide rich, detailed explanations for each product.
Return JSON in the same format as the example."#;

/// Multi-shot: two or more worked examples. Replace `{examples}`,
/// `{products}`, `{tools_json}`.
pub const MULTI_SHOT_PROMPT_TEMPLATE: &str = r#"Here are some example comparisons:
{examples}

Now compare these products: {products}
Use this data: {tools_json}
Highlight key differences with a "diff" field for each feature.
Provide detailed explanations for each product.
Return JSON in the same format as the examples."#;

/// System message for the system/user role split — fixes the assistant
/// persona and the output contract.
pub const SYSTEM_USER_SYSTEM: &str = "You are a professional digital product comparison assistant. \
    Always return a JSON object containing 'products', 'comparison' with detailed pros, cons, \
    and key differences, and a 'recommendation'. Be informative and highlight differences clearly.";

/// User message for the system/user variant.
pub const SYSTEM_USER_PROMPT_TEMPLATE: &str = r#"Compare these products: {products}.
Use this data: {tools_json}.
Return JSON in the format: { "products": [...], "comparison": [{"feature": "", "details": {"Product1": "", "Product2": ""}, "diff": ""}], "recommendation": "short text" }"#;

/// System message for chain-of-thought — step-by-step reasoning first.
pub const CHAIN_OF_THOUGHT_SYSTEM: &str = "You are an expert digital product comparison assistant. \
    Explain your reasoning step by step before providing the final comparison JSON. \
    Include pros, cons, and key differences for each feature.";

pub const CHAIN_OF_THOUGHT_PROMPT_TEMPLATE: &str = r#"Compare these products: {products}.
Use this data: {tools_json}.
Explain your thought process first (step-by-step reasoning), then provide the final comparison in JSON format:
{
  "products": [...],
  "comparison": [{"feature": "", "details": {"Product1": "", "Product2": ""}, "diff": ""}],
  "recommendation": "short text"
}"#;

/// System message for structured output — strict JSON, no extra text.
pub const STRUCTURED_OUTPUT_SYSTEM: &str = "You are an expert digital product comparison assistant. \
    Always respond in strict JSON format. Include 'products' (array), 'comparison' (array of \
    features with 'feature', 'details', and 'diff'), and 'recommendation' (string). \
    Do not include extra text.";

pub const STRUCTURED_OUTPUT_PROMPT_TEMPLATE: &str = r#"Compare these products: {products}.
Use this data: {tools_json}.
Return JSON in this exact structure:
{
  "products": ["Product1", "Product2"],
  "comparison": [
    {
      "feature": "Feature name",
      "details": {"Product1": "value", "Product2": "value"},
      "diff": "difference explanation"
    }
  ],
  "recommendation": "short text recommendation"
}"#;

/// Temperature-controlled: creative framing; the sampling temperature itself
/// is forwarded to the gateway, not embedded in the text.
pub const TEMPERATURE_PROMPT_TEMPLATE: &str = r#"Compare these products creatively based on their features.
Products: {products}
Data: {tools_json}
Return a JSON in this format:
{
  "products": [...],
  "comparison": [
    {
      "feature": "",
      "details": {"Product1": "", "Product2": ""},
      "diff": ""
    }
  ],
  "recommendation": "short text"
}
Be as creative or conservative as the temperature allows."#;

/// A worked example pair: input product list and the fully-formed expected
/// output, embedded verbatim into few-shot prompts.
pub struct WorkedExample {
    pub input: Value,
    pub output: Value,
}

/// The Canva example used by the one-shot prompt (and first in multi-shot).
pub fn canva_example() -> WorkedExample {
    WorkedExample {
        input: json!(["Canva Free", "Canva Pro"]),
        output: json!({
            "products": ["Canva Free", "Canva Pro"],
            "comparison": [
                {
                    "feature": "Storage",
                    "details": {"Canva Free": "5GB", "Canva Pro": "1TB"},
                    "diff": "Pro has 200x more storage, good for teams with large media files"
                },
                {
                    "feature": "Team",
                    "details": {"Canva Free": "No", "Canva Pro": "Yes"},
                    "diff": "Pro supports collaborative editing and team management"
                },
                {
                    "feature": "Templates",
                    "details": {"Canva Free": "Limited", "Canva Pro": "Extensive"},
                    "diff": "Pro offers hundreds more templates for professional designs"
                }
            ],
            "recommendation": "Canva Pro is better for professional use, team collaboration, and large-scale projects."
        }),
    }
}

/// The Notion example appended for the multi-shot prompt.
pub fn notion_example() -> WorkedExample {
    WorkedExample {
        input: json!(["Notion Free", "Notion Plus"]),
        output: json!({
            "products": ["Notion Free", "Notion Plus"],
            "comparison": [
                {
                    "feature": "Blocks",
                    "details": {"Notion Free": "Unlimited", "Notion Plus": "Unlimited"},
                    "diff": "Plus includes advanced analytics"
                },
                {
                    "feature": "Team Collaboration",
                    "details": {"Notion Free": "Limited", "Notion Plus": "Advanced"},
                    "diff": "Plus allows larger teams and permissions control"
                }
            ],
            "recommendation": "Notion Plus is better for large teams needing advanced collaboration."
        }),
    }
}

/// Worked examples for the multi-shot variant, in embedding order.
pub fn multi_shot_examples() -> Vec<WorkedExample> {
    vec![canva_example(), notion_example()]
}
