use super::errors::FriendError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "friend_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Sent,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendRequestAction {
    Accept,
    Decline,
}

impl TryFrom<String> for FriendRequestAction {
    type Error = FriendError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            _ => Err(FriendError::InvalidAction(value)),
        }
    }
}

impl FriendRequestAction {
    /// The terminal state a `sent` request reaches through this action.
    pub fn outcome(self) -> FriendRequestStatus {
        match self {
            FriendRequestAction::Accept => FriendRequestStatus::Accepted,
            FriendRequestAction::Decline => FriendRequestStatus::Declined,
        }
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct FriendRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendRequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(sqlx::FromRow, Debug)]
pub struct IncomingRequestRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub status: FriendRequestStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FriendRequestSender {
    pub id: Uuid,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IncomingFriendRequest {
    pub id: Uuid,
    pub sender: FriendRequestSender,
    pub status: FriendRequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<IncomingRequestRow> for IncomingFriendRequest {
    fn from(row: IncomingRequestRow) -> Self {
        Self {
            id: row.id,
            sender: FriendRequestSender {
                id: row.sender_id,
                username: row.sender_username,
            },
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NewFriendRequest {
    pub receiver_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FriendRequestResponse {
    pub action: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FriendRequestOutcome {
    pub id: Uuid,
    pub status: FriendRequestStatus,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Friend {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}
