use serde::{Deserialize, Serialize};

const ADMIN_ROLES: [&str; 2] = ["group_admin", "root"];

/// Account resolved by the external auth service for the current request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub email_confirmed: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        ADMIN_ROLES.contains(&self.role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_roles() {
        let mut user = User::default();
        user.role = "group_user".to_string();
        assert!(!user.is_admin());

        user.role = "group_admin".to_string();
        assert!(user.is_admin());

        user.role = "root".to_string();
        assert!(user.is_admin());
    }
}
