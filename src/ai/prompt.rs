use schemars::{schema_for, JsonSchema};

use super::schema::{ExplainInput, ExplainOutput, TranslateInput, TranslateOutput};

pub const TRANSLATE_SYSTEM: &str =
    "You are a command-line expert. Respond only with the requested JSON object.";
pub const EXPLAIN_SYSTEM: &str =
    "You are an expert in command-line tools. Respond only with the requested JSON object.";

pub fn translate(input: &TranslateInput) -> String {
    format!(
        "Convert the following natural language query into a command-line command \
         for the specified operating system.\n\
         \n\
         Natural Language Query: {}\n\
         Operating System: {}\n\
         \n\
         {}",
        input.natural_language_query.trim(),
        input.operating_system,
        output_instructions::<TranslateOutput>()
    )
}

pub fn explain(input: &ExplainInput) -> String {
    format!(
        "Explain the following command in a clear, concise manner, outlining its \
         functionality, parameters, and potential impact.\n\
         \n\
         Command: {}\n\
         \n\
         {}",
        input.command.trim(),
        output_instructions::<ExplainOutput>()
    )
}

fn output_instructions<T: JsonSchema>() -> String {
    let schema = serde_json::to_string_pretty(&schema_for!(T)).unwrap_or_default();
    format!(
        "Reply with a single JSON object matching this JSON Schema and nothing else:\n\
         ```json\n{}\n```",
        schema
    )
}
