//! Prompt construction for the answer cycle.
//!
//! Two variants: grounded (retrieved context available) and ungrounded.
//! Both embed the conversation recap as plain text even though the model
//! also receives the raw recent turns: the textual recap survives
//! history eviction and keeps the model oriented.

/// Fixed system persona sent with every completion request.
pub const SYSTEM_PERSONA: &str = "You are Mentor, an expert programmer assistant. \
     Keep responses technical, practical, and helpful.";

/// Prompt for a question with retrieved documentation context.
pub fn grounded(question: &str, context: &str, recap: &str) -> String {
    format!(
        "PREVIOUS CONVERSATION (for context):\n{recap}\n\n\
         RELEVANT DOCUMENTATION CONTEXT:\n{context}\n\n\
         CURRENT QUESTION: {question}\n\n\
         Use the documentation context as your primary source. If it does not \
         fully cover the question, say what is missing and still give the most \
         useful answer you can, never refusing outright. Build on the previous \
         discussion naturally and finish with practical next steps where they \
         make sense."
    )
}

/// Prompt for a question with no usable context.
pub fn ungrounded(question: &str, recap: &str) -> String {
    format!(
        "PREVIOUS CONVERSATION (for context):\n{recap}\n\n\
         CURRENT QUESTION: {question}\n\n\
         NOTE: No documentation context was found for this question. Answer \
         from general programming knowledge, be transparent that the docs did \
         not cover it, and suggest where the answer might be found. Build on \
         the previous discussion naturally."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounded_prompt_carries_all_three_inputs() {
        let prompt = grounded("the question", "the context", "the recap");
        assert!(prompt.contains("the question"));
        assert!(prompt.contains("the context"));
        assert!(prompt.contains("the recap"));
    }

    #[test]
    fn ungrounded_prompt_declares_the_missing_context() {
        let prompt = ungrounded("the question", "the recap");
        assert!(prompt.contains("No documentation context was found"));
        assert!(prompt.contains("the question"));
        assert!(prompt.contains("the recap"));
    }
}
