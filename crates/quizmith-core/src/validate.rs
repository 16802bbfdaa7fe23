use quizmith_model::quiz::question::Question;
use quizmith_model::quiz::quiz::Visibility;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const QUESTION_TEXT_MIN: usize = 5;
pub const OPTIONS_MIN: usize = 2;
pub const OPTIONS_MAX: usize = 6;
pub const TAGS_MAX: usize = 10;

/// A quiz as submitted by an untrusted caller, before any rule has been
/// checked. `correct_index` is a plain integer so out-of-range and negative
/// values survive deserialization and reach the gate.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionPayload>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The same quiz after every rule passed: strings trimmed, defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuiz {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub visibility: Visibility,
    pub tags: Vec<String>,
}

impl From<ValidatedQuiz> for QuizPayload {
    fn from(quiz: ValidatedQuiz) -> Self {
        Self {
            title: quiz.title,
            description: quiz.description,
            questions: quiz.questions.into_iter().map(Into::into).collect(),
            visibility: Some(quiz.visibility),
            tags: quiz.tags,
        }
    }
}

impl From<Question> for QuestionPayload {
    fn from(question: Question) -> Self {
        Self {
            text: question.text,
            options: question.options,
            correct_index: i64::try_from(question.correct_index).unwrap_or(i64::MAX),
            explanation: question.explanation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub message: String,
}

impl ValidationFailure {
    fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_owned(),
            index: None,
            message,
        }
    }

    fn question(index: usize, field: &str, message: String) -> Self {
        Self {
            field: field.to_owned(),
            index: Some(index),
            message,
        }
    }
}

/// All rule violations of a single question, in rule order. Shared between
/// the gate (which collects every entry) and the generation response
/// interpreter (which stops at the first).
#[must_use]
pub fn question_failures(question: &QuestionPayload, index: usize) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    if question.text.trim().len() < QUESTION_TEXT_MIN {
        failures.push(ValidationFailure::question(
            index,
            "text",
            format!("question text must be at least {QUESTION_TEXT_MIN} characters"),
        ));
    }

    let option_count = question.options.len();
    if !(OPTIONS_MIN..=OPTIONS_MAX).contains(&option_count) {
        failures.push(ValidationFailure::question(
            index,
            "options",
            format!("must have {OPTIONS_MIN}-{OPTIONS_MAX} options, got {option_count}"),
        ));
    }

    if question.options.iter().any(|option| option.trim().is_empty()) {
        failures.push(ValidationFailure::question(
            index,
            "options",
            "options must not be empty".to_owned(),
        ));
    }

    let in_range = usize::try_from(question.correct_index).is_ok_and(|correct| correct < option_count);
    if !in_range {
        failures.push(ValidationFailure::question(
            index,
            "correctIndex",
            format!(
                "correctIndex {} is out of range for {option_count} options",
                question.correct_index
            ),
        ));
    }

    failures
}

/// Normalization of a question that already passed [`question_failures`].
#[must_use]
pub fn normalize_question(question: QuestionPayload) -> Question {
    Question {
        text: question.text.trim().to_owned(),
        options: question.options.iter().map(|option| option.trim().to_owned()).collect(),
        // Range was checked by the caller; saturate instead of panicking.
        correct_index: usize::try_from(question.correct_index).unwrap_or_default(),
        explanation: question
            .explanation
            .map(|explanation| explanation.trim().to_owned())
            .filter(|explanation| !explanation.is_empty()),
    }
}

/// The validation gate. Checks every rule and collects every violation so a
/// client can surface all of them at once; a partial list would force users
/// through repeated submit-fix cycles.
pub fn validate(payload: QuizPayload) -> Result<ValidatedQuiz, Vec<ValidationFailure>> {
    let mut failures = Vec::new();

    let title = payload.title.trim();
    if !(TITLE_MIN..=TITLE_MAX).contains(&title.len()) {
        failures.push(ValidationFailure::new(
            "title",
            format!("title must be {TITLE_MIN}-{TITLE_MAX} characters"),
        ));
    }

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|description| !description.is_empty());
    if description.is_some_and(|description| description.len() > DESCRIPTION_MAX) {
        failures.push(ValidationFailure::new(
            "description",
            format!("description must be at most {DESCRIPTION_MAX} characters"),
        ));
    }

    if payload.questions.is_empty() {
        failures.push(ValidationFailure::new(
            "questions",
            "quiz must have at least 1 question".to_owned(),
        ));
    }

    for (index, question) in payload.questions.iter().enumerate() {
        failures.extend(question_failures(question, index));
    }

    if payload.tags.len() > TAGS_MAX {
        failures.push(ValidationFailure::new(
            "tags",
            format!("at most {TAGS_MAX} tags are allowed"),
        ));
    }

    if !failures.is_empty() {
        return Err(failures);
    }

    Ok(ValidatedQuiz {
        title: title.to_owned(),
        description: description.map(ToOwned::to_owned),
        questions: payload.questions.into_iter().map(normalize_question).collect(),
        visibility: payload.visibility.unwrap_or_default(),
        tags: payload.tags.iter().map(|tag| tag.trim().to_owned()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], correct_index: i64) -> QuestionPayload {
        QuestionPayload {
            text: text.to_owned(),
            options: options.iter().map(|s| (*s).to_owned()).collect(),
            correct_index,
            explanation: None,
        }
    }

    fn payload(title: &str, questions: Vec<QuestionPayload>) -> QuizPayload {
        QuizPayload {
            title: title.to_owned(),
            description: None,
            questions,
            visibility: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_valid_quiz_passes_unchanged() {
        let validated = validate(payload("JS", vec![question("What is 2+2?", &["3", "4", "5"], 1)])).unwrap();
        assert_eq!(validated.title, "JS");
        assert_eq!(validated.questions.len(), 1);
        assert_eq!(validated.questions[0].correct_index, 1);
        assert_eq!(validated.questions[0].options, vec!["3", "4", "5"]);
        assert_eq!(validated.visibility, Visibility::Public);
    }

    #[test]
    fn test_short_title_is_the_only_violation() {
        let failures = validate(payload("AB", vec![question("What is 2+2?", &["3", "4"], 0)])).unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "title");
        assert_eq!(failures[0].index, None);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let bad = QuizPayload {
            title: "  a  ".to_owned(),
            description: Some("d".repeat(501)),
            questions: vec![question("hm?", &["yes"], 3)],
            visibility: None,
            tags: (0..11).map(|i| format!("tag{i}")).collect(),
        };
        let failures = validate(bad).unwrap_err();
        let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description", "text", "options", "correctIndex", "tags"]);
        assert_eq!(failures[2].index, Some(0));
    }

    #[test]
    fn test_correct_index_bounds() {
        // One past the end is out of range, the last option is not
        assert!(!question_failures(&question("What is 2+2?", &["3", "4"], 2), 0).is_empty());
        assert!(question_failures(&question("What is 2+2?", &["3", "4"], 1), 0).is_empty());
        assert!(!question_failures(&question("What is 2+2?", &["3", "4"], -1), 0).is_empty());
    }

    #[test]
    fn test_option_count_bounds() {
        assert!(!question_failures(&question("What is 2+2?", &["4"], 0), 0).is_empty());
        assert!(question_failures(&question("Pick one", &["a", "b", "c", "d", "e", "f"], 5), 0).is_empty());
        assert!(!question_failures(&question("Pick one", &["a", "b", "c", "d", "e", "f", "g"], 0), 0).is_empty());
    }

    #[test]
    fn test_whitespace_option_is_rejected() {
        let failures = question_failures(&question("What is 2+2?", &["4", "   "], 0), 0);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "options");
    }

    #[test]
    fn test_duplicate_options_are_accepted() {
        assert!(question_failures(&question("What is 2+2?", &["4", "4"], 0), 0).is_empty());
    }

    #[test]
    fn test_empty_questions_rejected() {
        let failures = validate(payload("Empty quiz", vec![])).unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "questions");
    }

    #[test]
    fn test_validate_is_idempotent() {
        let first = validate(QuizPayload {
            title: "  Trimmed title  ".to_owned(),
            description: Some("  description  ".to_owned()),
            questions: vec![QuestionPayload {
                text: " What is 2+2? ".to_owned(),
                options: vec![" 3 ".to_owned(), "4".to_owned()],
                correct_index: 1,
                explanation: Some(" because ".to_owned()),
            }],
            visibility: None,
            tags: vec![" math ".to_owned()],
        })
        .unwrap();

        let second = validate(first.clone().into()).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.title, "Trimmed title");
        assert_eq!(second.questions[0].explanation.as_deref(), Some("because"));
    }
}
