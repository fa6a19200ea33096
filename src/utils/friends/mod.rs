pub mod errors;
pub mod models;

use crate::modules::database::DbErrMessage;
use anyhow::Context;
use sqlx::{query, query_as, Acquire, PgConnection, Postgres};
use tracing::debug;
use uuid::Uuid;

use self::{
    errors::FriendError,
    models::{
        Friend, FriendRequest, FriendRequestAction, FriendRequestStatus, IncomingFriendRequest,
        IncomingRequestRow,
    },
};

/// Order-independent key of the undirected friendship edge between two users.
pub fn friendship_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

pub async fn send_friend_request<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> Result<FriendRequest, FriendError> {
    if sender_id == receiver_id {
        return Err(FriendError::SelfRequest);
    }

    let mut transaction = conn.begin().await.context("Failed to begin transaction")?;

    lock_pair(&mut transaction, sender_id, receiver_id).await?;

    let receiver = query(
        r#"
            select id from users where id = $1
        "#,
    )
    .bind(receiver_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to select receiver")?;

    if receiver.is_none() {
        return Err(FriendError::UserNotFound);
    }

    //? is a friend already
    if friendship_exists(&mut transaction, sender_id, receiver_id).await? {
        return Err(FriendError::AlreadyFriends);
    }

    //? is request pending
    let res = query(
        r#"
            select id from friend_requests
            where sender_id = $1 and receiver_id = $2 and status = 'sent'
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to select friend request")?;

    if res.is_some() {
        return Err(FriendError::DuplicateRequest);
    }

    // a concurrent send that won the race still trips the pair constraint
    let request = query_as::<_, FriendRequest>(
        r#"
            insert into friend_requests (sender_id, receiver_id)
            values ($1, $2)
            returning id, sender_id, receiver_id, status, created_at
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .fetch_one(&mut transaction)
    .await
    .map_err(|e| {
        DbErrMessage::new(e)
            .unique_on("friend_requests_pair_key", FriendError::DuplicateRequest)
            .check(FriendError::SelfRequest)
            .fk(FriendError::UserNotFound)
            .into_err()
    })?;

    transaction.commit().await.context("Transaction failed")?;

    debug!("Friend request {} sent {sender_id} -> {receiver_id}", request.id);
    Ok(request)
}

/// Only the receiver may respond. The request row is consumed either way; accepting
/// also creates the friendship edge and drops a pending request in the other direction.
pub async fn respond_to_friend_request<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    request_id: Uuid,
    acting_user_id: Uuid,
    action: FriendRequestAction,
) -> Result<FriendRequestStatus, FriendError> {
    let mut transaction = conn.begin().await.context("Failed to begin transaction")?;

    let res: Option<(Uuid, Uuid)> = query_as(
        r#"
            delete from friend_requests
            where id = $1 and receiver_id = $2 and status = 'sent'
            returning sender_id, receiver_id
        "#,
    )
    .bind(request_id)
    .bind(acting_user_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to delete friend request")?;

    let Some((sender_id, receiver_id)) = res else {
        return Err(FriendError::RequestNotFound);
    };

    if action == FriendRequestAction::Accept {
        // statements below see a send that committed while we waited
        lock_pair(&mut transaction, sender_id, receiver_id).await?;

        let (user_a, user_b) = friendship_key(sender_id, receiver_id);
        query(
            r#"
                insert into friendships (user_a, user_b)
                values ($1, $2)
                on conflict do nothing
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .execute(&mut transaction)
        .await
        .context("Failed to add friends")?;

        query(
            r#"
                delete from friend_requests
                where sender_id = $1 and receiver_id = $2
            "#,
        )
        .bind(receiver_id)
        .bind(sender_id)
        .execute(&mut transaction)
        .await
        .context("Failed to delete reverse friend request")?;
    }

    transaction.commit().await.context("Transaction failed")?;

    let status = action.outcome();
    debug!("Friend request {request_id} {status:?}");
    Ok(status)
}

pub async fn fetch_incoming_requests<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<IncomingFriendRequest>, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let requests = query_as::<_, IncomingRequestRow>(
        r#"
            select friend_requests.id, friend_requests.sender_id,
                   users.username as sender_username,
                   friend_requests.status, friend_requests.created_at
            from friend_requests
            join users on users.id = friend_requests.sender_id
            where friend_requests.receiver_id = $1
            order by friend_requests.created_at, friend_requests.id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch friend requests")?;

    Ok(requests.into_iter().map(Into::into).collect())
}

pub async fn fetch_user_friends<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<Friend>, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let friends = query_as::<_, Friend>(
        r#"
            select users.id, users.username, users.name from friendships
            join users on users.id = case
                when friendships.user_a = $1 then friendships.user_b
                else friendships.user_a
            end
            where friendships.user_a = $1 or friendships.user_b = $1
            order by users.username
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch friends")?;

    Ok(friends)
}

pub async fn remove_user_friend<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    friend_id: Uuid,
) -> Result<(), FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let (user_a, user_b) = friendship_key(user_id, friend_id);
    let res = query(
        r#"
            delete from friendships
            where user_a = $1 and user_b = $2
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .execute(&mut *conn)
    .await
    .context("Failed to remove friend")?;

    if res.rows_affected() == 0 {
        debug!("Can not remove not friend");
        return Err(FriendError::NotFriends);
    }

    Ok(())
}

pub async fn is_friend<'c>(
    acq: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    friend_id: Uuid,
) -> Result<bool, FriendError> {
    let mut conn = acq.acquire().await.context("Failed to acquire")?;
    friendship_exists(&mut *conn, user_id, friend_id).await
}

async fn friendship_exists(
    conn: &mut PgConnection,
    user_id: Uuid,
    friend_id: Uuid,
) -> Result<bool, FriendError> {
    let (user_a, user_b) = friendship_key(user_id, friend_id);
    let exists = query(
        r#"
            select 1 from friendships
            where user_a = $1 and user_b = $2
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_optional(conn)
    .await
    .context("Failed to select user friend")?
    .is_some();

    Ok(exists)
}

/// Serializes sends and accepts touching the same pair until the transaction ends.
async fn lock_pair(conn: &mut PgConnection, a: Uuid, b: Uuid) -> Result<(), FriendError> {
    let (user_a, user_b) = friendship_key(a, b);
    query(
        r#"
            select pg_advisory_xact_lock(hashtextextended($1, 0))
        "#,
    )
    .bind(format!("friendship:{user_a}:{user_b}"))
    .execute(conn)
    .await
    .context("Failed to lock user pair")?;

    Ok(())
}
