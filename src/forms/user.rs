use crate::models::user::User as UserModel;
use serde_derive::{Deserialize, Serialize};

/// Body returned by the auth service for a bearer token.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub user: User,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub role: String,
}

impl TryInto<UserModel> for UserForm {
    type Error = String;

    fn try_into(self) -> Result<UserModel, Self::Error> {
        if self.user.id.trim().is_empty() {
            return Err("auth service returned a user without id".to_string());
        }

        Ok(UserModel {
            id: self.user.id,
            first_name: self.user.first_name,
            last_name: self.user.last_name,
            email: self.user.email,
            role: self.user.role,
            email_confirmed: self.user.email_confirmed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_payload_converts_to_user() {
        let form: UserForm = serde_json::from_str(
            r#"{"user": {"_id": "42", "first_name": "Ada", "email": "ada@example.com", "role": "group_admin", "plan": {}}}"#,
        )
        .unwrap();

        let user: UserModel = form.try_into().unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.last_name, "");
        assert!(user.is_admin());
    }

    #[test]
    fn missing_id_is_rejected() {
        let form: UserForm = serde_json::from_str(r#"{"user": {"email": "x@example.com"}}"#).unwrap();
        let user: Result<UserModel, String> = form.try_into();
        assert!(user.is_err());
    }
}
