pub mod errors;
pub mod models;

use crate::modules::database::DbErrMessage;
use anyhow::Context;
use errors::HobbyError;
use models::Hobby;
use sqlx::{query, query_as, Acquire, Postgres};
use tracing::debug;
use uuid::Uuid;

/// Title-cases every alphabetic run and collapses whitespace:
/// `"  rock   CLIMBING "` becomes `"Rock Climbing"`.
pub fn normalize_hobby_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    for (i, word) in name.split_whitespace().enumerate() {
        if i > 0 {
            normalized.push(' ');
        }
        let mut prev_cased = false;
        for c in word.chars() {
            if prev_cased {
                normalized.extend(c.to_lowercase());
            } else {
                normalized.extend(c.to_uppercase());
            }
            prev_cased = c.is_alphabetic();
        }
    }
    normalized
}

pub async fn create_hobby<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    name: &str,
) -> Result<Hobby, HobbyError> {
    let name = normalize_hobby_name(name);
    if name.is_empty() {
        return Err(HobbyError::MissingName);
    }

    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let hobby = query_as::<_, Hobby>(
        r#"
            insert into hobbies (name)
            values ($1)
            returning id, name
        "#,
    )
    .bind(&name)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        DbErrMessage::new(e)
            .unique(HobbyError::AlreadyExists)
            .into_err()
    })?;

    debug!("Created hobby {} ({})", hobby.name, hobby.id);
    Ok(hobby)
}

/// Attaching an already attached hobby is a no-op.
pub async fn attach_hobby<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    hobby_id: Uuid,
) -> Result<(), HobbyError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    query(
        r#"
            insert into user_hobbies (user_id, hobby_id)
            values ($1, $2)
            on conflict do nothing
        "#,
    )
    .bind(user_id)
    .bind(hobby_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| DbErrMessage::new(e).fk(HobbyError::HobbyNotFound).into_err())?;

    Ok(())
}

pub async fn detach_hobby<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    hobby_id: Uuid,
) -> Result<(), HobbyError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let res = query(
        r#"
            delete from user_hobbies
            where user_id = $1 and hobby_id = $2
        "#,
    )
    .bind(user_id)
    .bind(hobby_id)
    .execute(&mut *conn)
    .await
    .context("Failed to detach hobby")?;

    if res.rows_affected() == 0 {
        return Err(HobbyError::NotAttached);
    }

    Ok(())
}

pub async fn fetch_all_hobbies<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
) -> Result<Vec<Hobby>, HobbyError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let hobbies = query_as::<_, Hobby>(
        r#"
            select id, name from hobbies
            order by name
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch hobbies")?;

    Ok(hobbies)
}

pub async fn fetch_user_hobbies<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<Hobby>, HobbyError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let hobbies = query_as::<_, Hobby>(
        r#"
            select hobbies.id, hobbies.name from user_hobbies
            join hobbies on hobbies.id = user_hobbies.hobby_id
            where user_hobbies.user_id = $1
            order by hobbies.name
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch user hobbies")?;

    Ok(hobbies)
}
