use crate::models::questionnaire::Question;
use crate::services::classifier::BandThresholds;
use crate::services::errors::CatalogError;

/// Totals at or above this are Adequate in the built-in catalog.
pub const ADEQUATE_MIN_SCORE: i32 = 8;
/// Totals at or above this (and below Adequate) are Borderline in the built-in catalog.
pub const BORDERLINE_MIN_SCORE: i32 = 4;

/// Ordered, immutable question list plus the thresholds its scores are judged by.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
    thresholds: BandThresholds,
}

impl Catalog {
    pub fn new(questions: Vec<Question>, thresholds: BandThresholds) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(q) = questions.iter().find(|q| q.options.is_empty()) {
            return Err(CatalogError::NoOptions(q.code.clone()));
        }
        Ok(Self {
            questions,
            thresholds,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    // never true, construction rejects empty catalogs
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn thresholds(&self) -> &BandThresholds {
        &self.thresholds
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    /// Pulls an index back into `[0, len - 1]`.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    /// Looks up a question, clamping out-of-range indices instead of failing.
    pub fn question(&self, index: usize) -> (usize, &Question) {
        let index = self.clamp_index(index);
        (index, &self.questions[index])
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// The vitamin D self-assessment served by default.
    pub fn vitamin_d() -> Self {
        let questions = vec![
            Question::new(
                "sun_exposure",
                "On a typical day, how long are you outdoors between 10am and 3pm?",
            )
            .with_helper("Count time with direct sun on your skin, not time behind glass.")
            .with_option("Less than 10 minutes", 0)
            .with_option("10 to 30 minutes", 1)
            .with_option("More than 30 minutes", 2),
            Question::new("skin_type", "Which best describes your skin?")
                .with_helper("Darker skin makes vitamin D more slowly from the same UV.")
                .with_option("Dark, rarely burns", 0)
                .with_option("Olive or medium, sometimes burns", 1)
                .with_option("Fair, burns easily", 2),
            Question::new(
                "location_season",
                "Where do you live and what season is it right now?",
            )
            .with_helper("Southern states in winter receive much less UV.")
            .with_option("Southern state, winter", 0)
            .with_option("Southern state summer, or northern state winter", 1)
            .with_option("Northern state, summer", 2),
            Question::new(
                "clothing_coverage",
                "When you are outside, how much of your skin is usually covered?",
            )
            .with_option("Almost all of it", 0)
            .with_option("Arms or legs uncovered", 1)
            .with_option("Arms and legs uncovered", 2),
            Question::new(
                "diet",
                "How often do you eat oily fish, eggs, or fortified milk or margarine?",
            )
            .with_option("Rarely or never", 0)
            .with_option("A few times a week", 1)
            .with_option("Most days", 2),
            Question::new("supplements", "Do you take a vitamin D supplement?")
                .with_helper("Talk to a healthcare provider before starting one.")
                .with_option("No", 0)
                .with_option("Occasionally", 1)
                .with_option("Yes, daily", 2),
        ];

        let thresholds = BandThresholds {
            borderline_from: BORDERLINE_MIN_SCORE,
            adequate_from: ADEQUATE_MIN_SCORE,
        };

        Self { questions, thresholds }
    }
}
