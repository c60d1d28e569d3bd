use crate::application_port::UserError;
use crate::domain_model::*;
use serde::Deserialize;

/// Integer field that clients send either as a JSON number or as a numeric
/// string. Parsed explicitly; never defaults to zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseInt {
    Number(i64),
    Text(String),
}

impl LooseInt {
    pub fn parse(&self, field: &'static str) -> Result<i32, UserError> {
        match self {
            LooseInt::Number(n) => i32::try_from(*n)
                .map_err(|_| UserError::validation(field, format!("{n} is out of range"))),
            LooseInt::Text(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|e| UserError::validation(field, format!("{s:?} is not an integer: {e}"))),
        }
    }

    pub fn parse_id(&self, field: &'static str) -> Result<UserId, UserError> {
        self.parse(field).map(UserId)
    }
}

pub fn parse_path_id(raw: &str) -> Result<UserId, UserError> {
    raw.parse::<UserId>()
        .map_err(|e| UserError::validation("id", format!("{raw:?} is not an integer: {e}")))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub age: LooseInt,
    // absent and null both mean no friends
    #[serde(default)]
    pub friends: Option<Vec<LooseInt>>,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> Result<NewUser, UserError> {
        let age = self.age.parse("age")?;
        let friends = self
            .friends
            .unwrap_or_default()
            .iter()
            .map(|f| f.parse_id("friends"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewUser {
            name: self.name,
            age,
            friends,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BefriendRequest {
    pub source_id: LooseInt,
    pub target_id: LooseInt,
}

impl BefriendRequest {
    pub fn to_friend_request(&self) -> Result<FriendRequest, UserError> {
        Ok(FriendRequest {
            source_id: self.source_id.parse_id("source_id")?,
            target_id: self.target_id.parse_id("target_id")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub target_id: LooseInt,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAgeRequest {
    pub new_age: LooseInt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        let body: CreateUserRequest =
            serde_json::from_str(r#"{"name":"Bob","age":"25","friends":[1," 2",3]}"#).unwrap();
        let user = body.into_new_user().unwrap();
        assert_eq!(user.age, 25);
        assert_eq!(user.friends, vec![UserId(1), UserId(2), UserId(3)]);
    }

    #[test]
    fn one_bad_friend_id_rejects_the_request() {
        let body: CreateUserRequest =
            serde_json::from_str(r#"{"name":"Bob","age":25,"friends":["1","two"]}"#).unwrap();
        let err = body.into_new_user().unwrap_err();
        assert!(matches!(err, UserError::Validation { field: "friends", .. }));
    }

    #[test]
    fn out_of_range_numbers_are_validation_errors() {
        let age = LooseInt::Number(i64::from(i32::MAX) + 1);
        assert!(matches!(
            age.parse("age"),
            Err(UserError::Validation { field: "age", .. })
        ));
    }

    #[test]
    fn friends_default_to_empty() {
        let body: CreateUserRequest = serde_json::from_str(r#"{"name":"Al","age":3}"#).unwrap();
        assert!(body.into_new_user().unwrap().friends.is_empty());
    }

    #[test]
    fn null_friends_mean_no_friends() {
        let body: CreateUserRequest =
            serde_json::from_str(r#"{"name":"Al","age":3,"friends":null}"#).unwrap();
        assert!(body.into_new_user().unwrap().friends.is_empty());
    }

    #[test]
    fn path_ids_must_be_numeric() {
        assert_eq!(parse_path_id("12").unwrap(), UserId(12));
        assert!(parse_path_id("abc").is_err());
    }
}
