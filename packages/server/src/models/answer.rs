use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for answering a step's questions. Keys are question ids
/// (JSON object keys, so strings), values are the selected option letters.
#[derive(Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

impl AnswerRequest {
    /// Parse the raw answer map into `(question_id, selected_option)` pairs.
    /// An empty map is rejected. Entries with an unparseable key or a blank
    /// selection are skipped rather than recorded or rejected.
    pub fn parsed(&self) -> Result<HashMap<i32, String>, AppError> {
        if self.answers.is_empty() {
            return Err(AppError::Validation("answers object is required".into()));
        }
        let mut out = HashMap::with_capacity(self.answers.len());
        for (key, selected) in &self.answers {
            let Ok(qid) = key.trim().parse::<i32>() else {
                continue;
            };
            let selected = selected.trim();
            if selected.is_empty() {
                continue;
            }
            out.insert(qid, selected.to_ascii_uppercase());
        }
        Ok(out)
    }
}

/// Grading outcome for a single question.
#[derive(Serialize)]
pub struct QuestionResultDto {
    pub question_id: i32,
    pub selected_option: String,
    pub is_correct: bool,
    pub points_awarded: i32,
    pub max_points: i32,
    pub is_retry: bool,
    /// `None` on first attempts; on retries, whether the prior answer was
    /// already correct (in which case the award is frozen).
    pub was_previously_correct: Option<bool>,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub success: bool,
    pub results: Vec<QuestionResultDto>,
    pub total_points: i32,
    pub max_points: i32,
    /// True only when at least one answer was graded and none were wrong.
    pub all_correct: bool,
}

/// Previously recorded answers for a step.
#[derive(Serialize)]
pub struct StepAnswersResponse {
    pub success: bool,
    /// question id -> selected option, for pre-filling the form.
    pub answers: HashMap<i32, String>,
    pub results: Vec<QuestionResultDto>,
    pub total_points: i32,
    pub max_points: i32,
    pub all_correct: bool,
    pub has_answers: bool,
}
