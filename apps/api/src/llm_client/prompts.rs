// Shared prompt fragments. Each service that calls the LLM keeps its own
// prompts.rs alongside it and pulls cross-cutting pieces from here.

/// Instruction appended to prompts that expect a JSON object back.
/// Models ignore this often enough that replies still go through the tolerant parser.
pub const JSON_OBJECT_ONLY: &str = "Respond with a single JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
