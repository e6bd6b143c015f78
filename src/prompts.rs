//! Prompt text and reply conventions for the answerer.
//!
//! The system prompt and the answer prefix form one contract: the prompt
//! tells the model to begin with [`ANSWER_PREFIX`], and
//! [`crate::pipeline::answer::extract_answer`] strips exactly that prefix.
//! Changing one without the other turns every reply into the fallback.

/// Fixed persona sent as the system message.
///
/// Used when `SolverConfig::system_prompt` is `None`.
pub const SYSTEM_PROMPT: &str = "You are an AI trained on a diverse range of internet text. \
You will be given a question with options following it. You are to read the question and \
the options carefully, critically analyze each option, compare them, and then determine the \
most accurate answer based on the information provided and your vast training data. \
Respond by saying 'The correct answer is:' followed by the full text of the correct answer. \
Remember, only provide the final answer and ensure that it's the most precise choice possible.";

/// Prefix every well-formed reply starts with.
pub const ANSWER_PREFIX: &str = "The correct answer is: ";

/// Returned when the reply does not start with [`ANSWER_PREFIX`].
pub const FALLBACK_ANSWER: &str = "I'm sorry, but I couldn't determine a clear answer.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_names_the_reply_template() {
        assert!(SYSTEM_PROMPT.contains(ANSWER_PREFIX.trim_end()));
        assert!(SYSTEM_PROMPT.contains("full text of the correct answer"));
    }
}
