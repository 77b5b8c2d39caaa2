use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Marks differences below this are treated as rounding noise.
const SCORE_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Strictness {
    Strict,
    #[default]
    Moderate,
    Lenient,
}

impl Strictness {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Moderate => "Moderate",
            Self::Lenient => "Lenient",
        }
    }
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "moderate" => Ok(Self::Moderate),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("Unknown strictness '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Language {
    #[default]
    English,
    Tamil,
}

impl Language {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Tamil => "Tamil",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "tamil" | "ta" => Ok(Self::Tamil),
            other => Err(format!("Unknown language '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum AnswerStatus {
    Correct,
    #[serde(rename = "Partially Correct", alias = "Partially correct", alias = "PartiallyCorrect")]
    PartiallyCorrect,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct QuestionGrade {
    #[serde(deserialize_with = "deserialize_question_number")]
    pub(crate) question_number: String,
    pub(crate) marks_obtained: f64,
    pub(crate) max_marks: f64,
    pub(crate) feedback: String,
    pub(crate) status: AnswerStatus,
}

/// The structured grade the model returns for one answer sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct GradingResult {
    pub(crate) student_name: String,
    pub(crate) total_score_obtained: f64,
    pub(crate) max_score: f64,
    pub(crate) question_wise_breakdown: Vec<QuestionGrade>,
    pub(crate) overall_feedback: String,
    pub(crate) improvement_pointers: Vec<String>,
    pub(crate) concepts_to_revise: Vec<String>,
    pub(crate) real_world_connections: String,
}

impl GradingResult {
    pub(crate) fn breakdown_total(&self) -> f64 {
        self.question_wise_breakdown.iter().map(|question| question.marks_obtained).sum()
    }

    /// Arithmetic the model was asked to honor but may not have. These are
    /// reported alongside the grade; they never reject it.
    pub(crate) fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let breakdown_total = self.breakdown_total();
        if !self.question_wise_breakdown.is_empty()
            && (breakdown_total - self.total_score_obtained).abs() > SCORE_EPSILON
        {
            warnings.push(format!(
                "total_score_obtained {} does not match the question breakdown sum {}",
                self.total_score_obtained, breakdown_total
            ));
        }

        if self.total_score_obtained > self.max_score + SCORE_EPSILON {
            warnings.push(format!(
                "total_score_obtained {} exceeds max_score {}",
                self.total_score_obtained, self.max_score
            ));
        }

        for question in &self.question_wise_breakdown {
            if question.marks_obtained > question.max_marks + SCORE_EPSILON {
                warnings.push(format!(
                    "question {} awards {} of {} marks",
                    question.question_number, question.marks_obtained, question.max_marks
                ));
            }
        }

        warnings
    }
}

fn deserialize_question_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Integer(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    })
}
