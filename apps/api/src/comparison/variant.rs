use crate::llm_client::{MODEL_CHAT, MODEL_FLASH};

/// Default sampling temperature when the temperature variant gets none.
/// Deliberately unbounded — no range validation, matching source behavior.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Whether a variant sends one flat prompt string or role-separated messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptShape {
    Single,
    Chat,
}

/// The seven recognized prompt variants. One pipeline, seven descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    ZeroShot,
    OneShot,
    MultiShot,
    SystemUser,
    ChainOfThought,
    StructuredOutput,
    Temperature,
}

/// Everything variant-specific the pipeline needs to know.
#[derive(Debug, Clone, Copy)]
pub struct VariantSpec {
    pub shape: PromptShape,
    /// Model id forwarded to the gateway: completion-style for single
    /// prompts, chat-style for message pairs.
    pub model: &'static str,
    /// Whether the pipeline checks the cache before generating. Off for
    /// zero-shot, one-shot and temperature — the original controllers skip
    /// (or comment out) the lookup there. All variants still WRITE the cache.
    pub cache_lookup: bool,
    /// Only the temperature variant forwards a sampling temperature.
    pub forwards_temperature: bool,
    /// Chain-of-thought output interleaves reasoning prose around the JSON,
    /// so the normalizer additionally brace-slices before parsing.
    pub brace_slice: bool,
}

impl Variant {
    pub fn spec(&self) -> VariantSpec {
        match self {
            Variant::ZeroShot => VariantSpec {
                shape: PromptShape::Single,
                model: MODEL_FLASH,
                cache_lookup: false,
                forwards_temperature: false,
                brace_slice: false,
            },
            Variant::OneShot => VariantSpec {
                shape: PromptShape::Single,
                model: MODEL_FLASH,
                cache_lookup: false,
                forwards_temperature: false,
                brace_slice: false,
            },
            Variant::MultiShot => VariantSpec {
                shape: PromptShape::Single,
                model: MODEL_FLASH,
                cache_lookup: true,
                forwards_temperature: false,
                brace_slice: false,
            },
            Variant::SystemUser => VariantSpec {
                shape: PromptShape::Chat,
                model: MODEL_CHAT,
                cache_lookup: true,
                forwards_temperature: false,
                brace_slice: false,
            },
            Variant::ChainOfThought => VariantSpec {
                shape: PromptShape::Chat,
                model: MODEL_CHAT,
                cache_lookup: true,
                forwards_temperature: false,
                brace_slice: true,
            },
            Variant::StructuredOutput => VariantSpec {
                shape: PromptShape::Chat,
                model: MODEL_CHAT,
                cache_lookup: true,
                forwards_temperature: false,
                brace_slice: false,
            },
            Variant::Temperature => VariantSpec {
                shape: PromptShape::Single,
                model: MODEL_FLASH,
                cache_lookup: false,
                forwards_temperature: true,
                brace_slice: false,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::ZeroShot => "zero-shot",
            Variant::OneShot => "one-shot",
            Variant::MultiShot => "multi-shot",
            Variant::SystemUser => "system-user",
            Variant::ChainOfThought => "chain-of-thought",
            Variant::StructuredOutput => "structured-output",
            Variant::Temperature => "temperature",
        }
    }

    pub const ALL: [Variant; 7] = [
        Variant::ZeroShot,
        Variant::OneShot,
        Variant::MultiShot,
        Variant::SystemUser,
        Variant::ChainOfThought,
        Variant::StructuredOutput,
        Variant::Temperature,
    ];
}
