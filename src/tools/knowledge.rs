//! Nutrition Q&A tool

use serde::Serialize;

use crate::error::NutriError;
use crate::external::KnowledgeSource;

/// Answer shown when the language model cannot be reached
pub const ANSWER_UNAVAILABLE: &str =
    "Unable to answer the question due to a local language-model server issue.";

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    /// False when the answer is the fixed fallback message
    pub answered: bool,
}

/// Ask the knowledge source a free-form nutrition question
///
/// Upstream failures are logged and answered with a fixed message;
/// only an empty question is an error.
pub async fn ask_nutrition(
    source: &dyn KnowledgeSource,
    question: &str,
) -> Result<AskResponse, String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(NutriError::invalid_input("Please enter a nutrition question.").to_string());
    }

    let (answer, answered) = match source.answer(question).await {
        Ok(answer) => (answer, true),
        Err(e) => {
            tracing::error!("Nutrition question failed: {}", e);
            (ANSWER_UNAVAILABLE.to_string(), false)
        }
    };

    Ok(AskResponse {
        question: question.to_string(),
        answer,
        answered,
    })
}
