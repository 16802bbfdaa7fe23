use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

use crate::quiz::question::Question;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub requested_count: usize,
    pub actual_count: usize,
    pub difficulty: Difficulty,
}

/// Questions produced by one generation round. Ephemeral: lives between the
/// generate call and an explicit save, never persisted on its own. The
/// generator is not forced to honor the requested count, so `actual_count`
/// may legitimately be smaller than `requested_count`.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct GeneratedQuestionSet {
    pub questions: Vec<Question>,
    pub metadata: GenerationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_display() {
        assert_eq!("easy", Difficulty::Easy.to_string());
        assert_eq!("medium", Difficulty::Medium.to_string());
        assert_eq!("hard", Difficulty::Hard.to_string());
    }

    #[test]
    fn test_difficulty_serialize() {
        assert_eq!(r#""hard""#, serde_json::to_string(&Difficulty::Hard).unwrap());
        assert_eq!(Difficulty::Easy, serde_json::from_str::<Difficulty>(r#""easy""#).unwrap());
    }
}
