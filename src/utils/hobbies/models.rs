use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hobby {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NewHobby {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HobbyAttachment {
    pub hobby_id: Option<Uuid>,
}
