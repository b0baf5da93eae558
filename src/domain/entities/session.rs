use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::entities::validation::ValidationIssue;

/// Username/password pair sent to `/login`, `/users/register` and
/// `/users/:id`. Never persisted.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        if self.username.trim().is_empty() {
            issues.push(ValidationIssue::new("username", "Please input your username!"));
        }
        if self.password.is_empty() {
            issues.push(ValidationIssue::new("password", "Please input your password!"));
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "id_user", alias = "id")]
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_super_admin: bool,
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => text == "true",
        Some(Value::Number(number)) => number.as_i64() == Some(1),
        _ => false,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: i64,
    pub username: String,
    pub is_super_admin: bool,
}

impl AuthSession {
    pub fn from_login(response: LoginResponse, requested_username: &str) -> Self {
        Self {
            user_id: response.user_id,
            username: response
                .username
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| requested_username.to_string()),
            is_super_admin: response.is_super_admin,
        }
    }
}

/// Identity of the logged-in user. Populated on login, cleared on logout or
/// when the backend reports the session as expired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    session: Option<AuthSession>,
}

impl AuthContext {
    pub fn begin(&mut self, session: AuthSession) {
        self.session = Some(session);
    }

    pub fn clear(&mut self) {
        self.session = None;
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn username(&self) -> &str {
        self.session
            .as_ref()
            .map(|session| session.username.as_str())
            .unwrap_or_default()
    }

    pub fn is_super_admin(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_super_admin)
    }

    /// Keeps the displayed username in sync after a successful account update.
    pub fn rename(&mut self, username: &str) {
        if let Some(session) = self.session.as_mut() {
            session.username = username.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_accepts_string_flags_and_id_alias() {
        let response: LoginResponse = serde_json::from_value(json!({
            "id": 7,
            "username": "root",
            "is_super_admin": "true",
            "token": "ignored"
        }))
        .expect("decode");

        let session = AuthSession::from_login(response, "typed");

        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "root");
        assert!(session.is_super_admin);
    }

    #[test]
    fn session_falls_back_to_typed_username() {
        let response: LoginResponse =
            serde_json::from_value(json!({ "id_user": 3 })).expect("decode");

        let session = AuthSession::from_login(response, "alice");

        assert_eq!(session.username, "alice");
        assert!(!session.is_super_admin);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let printed = format!("{credentials:?}");
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn credentials_require_both_fields() {
        let issues = Credentials::default().validate().expect_err("should be invalid");
        let fields = issues.iter().map(|issue| issue.field.as_str()).collect::<Vec<_>>();
        assert_eq!(fields, vec!["username", "password"]);
    }

    #[test]
    fn context_lifecycle() {
        let mut context = AuthContext::default();
        assert!(!context.is_authenticated());

        context.begin(AuthSession {
            user_id: 1,
            username: "alice".to_string(),
            is_super_admin: true,
        });
        context.rename("alice2");
        assert_eq!(context.username(), "alice2");
        assert!(context.is_super_admin());

        context.clear();
        assert_eq!(context.username(), "");
        assert!(context.session().is_none());
    }
}
