use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identity of a user row (`users.id SERIAL`).
#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(UserId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: i32,
}

/// Signup payload: the user's own fields plus the ids to befriend right away.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub friends: Vec<UserId>,
}

#[derive(Debug, Clone, Copy)]
pub struct AgeUpdate {
    pub user_id: UserId,
    pub age: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_parses_surrounding_whitespace() {
        assert_eq!(" 42 ".parse::<UserId>().unwrap(), UserId(42));
        assert!("forty-two".parse::<UserId>().is_err());
    }

    #[test]
    fn user_serializes_id_as_plain_number() {
        let user = User {
            id: UserId(7),
            name: "Alice".to_string(),
            age: 30,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "name": "Alice", "age": 30}));
    }
}
