use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct RegisterCredentials {
    #[validate(length(min = 3, max = 32), custom = "no_whitespace")]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
}

impl RegisterCredentials {
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            name: None,
            date_of_birth: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Returned by register/login next to the `jwt` cookie, for clients that send bearer tokens.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub session_key: Uuid,
}

fn no_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("whitespace"));
    }
    Ok(())
}
