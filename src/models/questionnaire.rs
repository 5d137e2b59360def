use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: String,
    pub score: i32,
}

impl AnswerOption {
    pub fn new(label: impl Into<String>, score: i32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub code: String,
    pub text: String,
    pub helper: Option<String>,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
            helper: None,
            options: Vec::new(),
        }
    }

    pub fn with_helper(mut self, helper: impl Into<String>) -> Self {
        self.helper = Some(helper.into());
        self
    }

    pub fn with_option(mut self, label: impl Into<String>, score: i32) -> Self {
        self.options.push(AnswerOption::new(label, score));
        self
    }

    /// Score of the option at `index`, if it exists.
    pub fn option_score(&self, index: usize) -> Option<i32> {
        self.options.get(index).map(|opt| opt.score)
    }

    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }
}

/// Outcome band assigned to a total score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Band {
    Adequate,
    Borderline,
    Inadequate,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Adequate => "Adequate",
            Band::Borderline => "Borderline",
            Band::Inadequate => "Inadequate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Band::Adequate => "Your vitamin D level appears adequate",
            Band::Borderline => "Your vitamin D level may be borderline",
            Band::Inadequate => "Your vitamin D level may be inadequate",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified questionnaire outcome. Only ever derived from an answer set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionnaireResult {
    pub band: Band,
    pub total_score: i32,
}
