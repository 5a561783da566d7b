// Prompt text for résumé evaluation. Shared JSON-only wording lives in llm_client::prompts.

use crate::llm_client::prompts::JSON_OBJECT_ONLY;

/// System role sent with every evaluation request.
pub const EVALUATION_SYSTEM: &str =
    "You are a résumé evaluation assistant for recruiting. \
    You read a candidate's résumé, compare it with a job opening, \
    and report your assessment as structured data.";

/// Builds the user prompt for one résumé. The résumé text is appended verbatim,
/// untruncated; an empty résumé still produces a prompt.
pub fn build_prompt(job_name: &str, job_description: &str, resume_text: &str) -> String {
    let mut prompt = format!(
        "Analyse this résumé for the job opening '{job_name}'.\n\
        Return JSON with these fields:\n\
        - name: the candidate's full name\n\
        - education: the candidate's education\n\
        - skills: list of skills\n\
        - languages: list of spoken languages\n\
        - score: integer from 0 to 100 rating fit for the opening\n\
        - opinion: a short critique of the résumé against the opening\n\
        {JSON_OBJECT_ONLY}\n"
    );

    if !job_description.trim().is_empty() {
        prompt.push_str("\nJob description:\n");
        prompt.push_str(job_description.trim());
        prompt.push('\n');
    }

    prompt.push_str("\nRésumé:\n");
    prompt.push_str(resume_text);
    prompt
}
