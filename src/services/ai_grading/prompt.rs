use crate::schemas::grading::{Language, Strictness};

use super::GradeRequest;

fn strictness_clause(strictness: Strictness) -> &'static str {
    match strictness {
        Strictness::Strict => {
            "Be very strict. Deduct marks for minor errors, spelling mistakes and lack of \
             clarity. Expect high precision."
        }
        Strictness::Moderate => {
            "Be moderate. Balance precision with understanding and grade fairly against the \
             answer key."
        }
        Strictness::Lenient => {
            "Be lenient. Award marks for partial understanding and effort. Ignore minor \
             spelling or grammar errors when the concept is understood."
        }
    }
}

fn language_clause(language: Language) -> &'static str {
    match language {
        Language::English => "Write all feedback and explanations in English.",
        Language::Tamil => {
            "Write 'overall_feedback', 'improvement_pointers' and 'real_world_connections' in \
             Tamil. Technical terms may stay in English where that is clearer, but the \
             explanation itself must be in Tamil."
        }
    }
}

pub(super) fn grading_prompt(request: &GradeRequest) -> String {
    format!(
        r#"You are an expert academic grader for {level} students in Tamil Nadu, India.
Grade the handwritten answer sheet in the attached image.

Student name: {name} (use this name in the report)
Grading mode: {mode}
{mode_clause}

Language:
{language_clause}

Context:
- Question paper: {question_paper}
- Answer key / rubric: {answer_key}
- Maximum marks: {max_marks}

Instructions:
1. Read the handwritten answers carefully, including untidy handwriting.
2. Award marks for each question according to the answer key and the grading mode.
3. Give specific feedback per answer: what was right and what was missing.
4. Suggest how the student can improve next time.
5. For each major concept, explain why it matters in real life.
6. Reply with a single JSON object and nothing else.

JSON structure:
{{
  "student_name": "{name}",
  "total_score_obtained": <number>,
  "max_score": {max_marks},
  "question_wise_breakdown": [
    {{
      "question_number": "1",
      "marks_obtained": <number>,
      "max_marks": <number>,
      "feedback": "Specific feedback for this answer",
      "status": "Correct" | "Partially Correct" | "Incorrect"
    }}
  ],
  "overall_feedback": "General summary of performance",
  "improvement_pointers": ["Point 1", "Point 2"],
  "concepts_to_revise": ["Concept 1", "Concept 2"],
  "real_world_connections": "A short paragraph on the real-world importance of the topics in this exam."
}}
"#,
        level = request.student_level,
        name = request.student_name,
        mode = request.strictness.as_str(),
        mode_clause = strictness_clause(request.strictness),
        language_clause = language_clause(request.language),
        question_paper = request.question_paper_text,
        answer_key = request.answer_key_text,
        max_marks = request.max_marks,
    )
}

pub(super) fn study_plan_prompt(grading_result: &serde_json::Value, language: Language) -> String {
    format!(
        r#"Based on the grading result below, write a short, motivating study plan for the student in {language}.
Focus on 'concepts_to_revise' and explain why each concept matters in real life.

Grading result:
{result}

Output format: Markdown
"#,
        language = language.as_str(),
        result = grading_result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(strictness: Strictness, language: Language) -> GradeRequest {
        GradeRequest {
            image: Vec::new(),
            mime_type: "image/png".to_string(),
            question_paper_text: "Q1. State Newton's second law.".to_string(),
            answer_key_text: "F = ma, 5 marks".to_string(),
            max_marks: 50,
            student_name: "Asha".to_string(),
            student_level: "High School".to_string(),
            strictness,
            language,
        }
    }

    #[test]
    fn grading_prompt_embeds_every_parameter() {
        let prompt = grading_prompt(&request(Strictness::Moderate, Language::English));
        assert!(prompt.contains("for High School students in Tamil Nadu, India."));
        assert!(prompt.contains("Student name: Asha"));
        assert!(prompt.contains("Grading mode: Moderate"));
        assert!(prompt.contains("Q1. State Newton's second law."));
        assert!(prompt.contains("F = ma, 5 marks"));
        assert!(prompt.contains("Maximum marks: 50"));
        assert!(prompt.contains("\"max_score\": 50"));
        assert!(prompt.contains("Write all feedback and explanations in English."));
    }

    #[test]
    fn strict_mode_asks_for_deductions() {
        let prompt = grading_prompt(&request(Strictness::Strict, Language::English));
        assert!(prompt.contains("Deduct marks for minor errors"));
        assert!(!prompt.contains("Be lenient"));
    }

    #[test]
    fn lenient_mode_rewards_effort() {
        let prompt = grading_prompt(&request(Strictness::Lenient, Language::English));
        assert!(prompt.contains("Award marks for partial understanding and effort"));
    }

    #[test]
    fn tamil_names_the_translated_fields() {
        let prompt = grading_prompt(&request(Strictness::Moderate, Language::Tamil));
        assert!(prompt.contains("'improvement_pointers'"));
        assert!(prompt.contains("must be in Tamil"));
    }

    #[test]
    fn study_plan_prompt_embeds_result_and_language() {
        let result = serde_json::json!({"concepts_to_revise": ["Friction"]});
        let prompt = study_plan_prompt(&result, Language::Tamil);
        assert!(prompt.contains("for the student in Tamil"));
        assert!(prompt.contains("\"concepts_to_revise\":[\"Friction\"]"));
        assert!(prompt.contains("Markdown"));
    }
}
