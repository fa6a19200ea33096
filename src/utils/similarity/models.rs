use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};
use time::Date;
use uuid::Uuid;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub common_hobbies: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimilarUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub common_hobbies: i64,
    pub age: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SimilarUsersPage {
    pub users: Vec<SimilarUser>,
    pub page: u32,
    pub pages: u32,
}

/// Query string of the similarity feed. Bounds are inclusive, `page` is 1-indexed.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy)]
pub struct SimilarityFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age_min: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age_max: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
}

/// Blank form fields (`?age_min=`) count as absent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UserSearch {
    pub search: Option<String>,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FoundUser {
    pub id: Uuid,
    pub username: String,
}
