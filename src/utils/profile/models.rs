use serde::{Deserialize, Serialize};
use time::Date;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ProfileRow {
    pub username: String,
    pub name: Option<String>,
    pub email: String,
    pub date_of_birth: Option<Date>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Profile {
    pub username: String,
    pub name: Option<String>,
    pub email: String,
    pub date_of_birth: Option<String>,
}

/// Absent fields keep their stored value.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}
