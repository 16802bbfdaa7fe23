use quizmith_model::quiz::generated::Difficulty;
use thiserror::Error;

pub const CONTENT_MIN: usize = 100;
pub const CONTENT_MAX: usize = 100_000;
pub const QUESTION_COUNT_MIN: usize = 1;
pub const QUESTION_COUNT_MAX: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("content must be at least {CONTENT_MIN} characters, got {0}")]
    ContentTooShort(usize),

    #[error("question count must be between {QUESTION_COUNT_MIN} and {QUESTION_COUNT_MAX}, got {0}")]
    QuestionCountOutOfRange(usize),
}

/// A fully-formed generation request, ready to be sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub text: String,
    pub question_count: usize,
    pub difficulty: Difficulty,
}

/// Builds the instruction text for one generation round. Content shorter
/// than the floor is rejected; content beyond the ceiling is truncated to
/// its prefix rather than rejected, an out-of-range question count is
/// rejected rather than clamped.
pub fn build_prompt(content: &str, question_count: usize, difficulty: Difficulty) -> Result<PromptSpec, BuildError> {
    let content = content.trim();
    if content.len() < CONTENT_MIN {
        return Err(BuildError::ContentTooShort(content.len()));
    }
    if !(QUESTION_COUNT_MIN..=QUESTION_COUNT_MAX).contains(&question_count) {
        return Err(BuildError::QuestionCountOutOfRange(question_count));
    }

    let content = truncate_at_ceiling(content);

    let text = format!(
        "You are an expert quiz creator. Generate {question_count} multiple-choice quiz questions \
based on the following content.

DIFFICULTY LEVEL: {difficulty}

CONTENT:
{content}

REQUIREMENTS:
1. Create EXACTLY {question_count} questions
2. Each question must have 4 options
3. Questions should be clear and unambiguous
4. One option must be correct
5. Include a brief explanation for the correct answer
6. Difficulty should be: {difficulty}

OUTPUT FORMAT (JSON):
{{
  \"questions\": [
    {{
      \"text\": \"Question text here?\",
      \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],
      \"correctIndex\": 0,
      \"explanation\": \"Why this answer is correct\"
    }}
  ]
}}

IMPORTANT:
- Return ONLY valid JSON, no markdown formatting or extra text
- Ensure questions are relevant to the provided content
- Make sure correctIndex is 0-3 (array index)
- Questions should test understanding, not just memorization

Generate the quiz questions now:"
    );

    Ok(PromptSpec {
        text,
        question_count,
        difficulty,
    })
}

fn truncate_at_ceiling(content: &str) -> &str {
    if content.len() <= CONTENT_MAX {
        return content;
    }
    // Back off to the previous char boundary so multi-byte text cannot split
    let mut end = CONTENT_MAX;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn test_content_floor() {
        assert_eq!(
            build_prompt(&content(99), 5, Difficulty::Medium),
            Err(BuildError::ContentTooShort(99))
        );
        assert!(build_prompt(&content(100), 5, Difficulty::Medium).is_ok());
    }

    #[test]
    fn test_whitespace_only_content_is_too_short() {
        assert_eq!(
            build_prompt(&" ".repeat(200), 5, Difficulty::Easy),
            Err(BuildError::ContentTooShort(0))
        );
    }

    #[test]
    fn test_question_count_bounds() {
        assert_eq!(
            build_prompt(&content(200), 0, Difficulty::Easy),
            Err(BuildError::QuestionCountOutOfRange(0))
        );
        assert_eq!(
            build_prompt(&content(200), 21, Difficulty::Easy),
            Err(BuildError::QuestionCountOutOfRange(21))
        );
        assert!(build_prompt(&content(200), 1, Difficulty::Easy).is_ok());
        assert!(build_prompt(&content(200), 20, Difficulty::Easy).is_ok());
    }

    #[test]
    fn test_content_is_truncated_to_prefix() {
        let long = content(150_000);
        let spec = build_prompt(&long, 5, Difficulty::Hard).unwrap();
        assert!(spec.text.contains(&content(CONTENT_MAX)));
        assert!(!spec.text.contains(&content(CONTENT_MAX + 1)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let mut long = content(CONTENT_MAX - 1);
        long.push_str("ääää");
        let spec = build_prompt(&long, 5, Difficulty::Hard).unwrap();
        assert!(spec.text.contains("CONTENT:\n"));
    }

    #[test]
    fn test_prompt_states_count_and_difficulty() {
        let spec = build_prompt(&content(200), 7, Difficulty::Hard).unwrap();
        assert!(spec.text.contains("Generate 7 multiple-choice quiz questions"));
        assert!(spec.text.contains("Create EXACTLY 7 questions"));
        assert!(spec.text.contains("DIFFICULTY LEVEL: hard"));
        assert_eq!(spec.question_count, 7);
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt(&content(200), 3, Difficulty::Medium).unwrap();
        let b = build_prompt(&content(200), 3, Difficulty::Medium).unwrap();
        assert_eq!(a, b);
    }
}
