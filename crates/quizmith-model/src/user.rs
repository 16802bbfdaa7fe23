use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, AsRefStr, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "ada@example.org")]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    pub created_at: chrono::NaiveDateTime,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize() {
        assert_eq!(r#""user""#, serde_json::to_string(&Role::User).unwrap());
        assert_eq!(r#""admin""#, serde_json::to_string(&Role::Admin).unwrap());
        let id = Uuid::new_v4();
        let user = User {
            id,
            email: "ada@example.org".to_owned(),
            name: None,
            role: Role::Admin,
            created_at: chrono::NaiveDateTime::default(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["role"], "admin");
        assert_eq!(value["email"], "ada@example.org");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!("user", format!("{}", Role::User));
        assert_eq!("admin", format!("{}", Role::Admin));
    }
}
