pub mod errors;
pub mod models;

use crate::{
    modules::database::DbErrMessage,
    utils::auth::{additions, models::SessionUser},
};
use anyhow::Context;
use errors::ProfileError;
use models::{Profile, ProfileRow, ProfileUpdate};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{query, query_as, Acquire, Postgres};
use time::{format_description::FormatItem, macros::format_description, Date};
use tracing::debug;
use uuid::Uuid;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            username: row.username,
            name: row.name,
            email: row.email,
            date_of_birth: row.date_of_birth.map(format_date),
        }
    }
}

pub async fn fetch_profile<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Profile, ProfileError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let row = query_as::<_, ProfileRow>(
        r#"
            select username, name, email, date_of_birth from users
            where id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to select profile")?
    .ok_or(ProfileError::UserNotFound)?;

    Ok(row.into())
}

/// Email uniqueness is checked here as well, not only at registration.
pub async fn update_profile<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<Profile, ProfileError> {
    let mut transaction = conn.begin().await.context("Failed to begin transaction")?;

    let mut row = query_as::<_, ProfileRow>(
        r#"
            select username, name, email, date_of_birth from users
            where id = $1
            for update
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to select profile")?
    .ok_or(ProfileError::UserNotFound)?;

    if let Some(name) = update.name {
        let name = name.trim();
        row.name = (!name.is_empty()).then(|| name.to_string());
    }

    if let Some(email) = update.email {
        let email = email.trim().to_lowercase();
        if !validator::validate_email(email.as_str()) {
            return Err(ProfileError::InvalidEmail);
        }
        row.email = email;
    }

    if let Some(raw) = update.date_of_birth.filter(|raw| !raw.trim().is_empty()) {
        row.date_of_birth = Some(parse_date(&raw).ok_or(ProfileError::InvalidDate)?);
    }

    query(
        r#"
            update users
            set name = $2, email = $3, date_of_birth = $4
            where id = $1
        "#,
    )
    .bind(user_id)
    .bind(&row.name)
    .bind(&row.email)
    .bind(row.date_of_birth)
    .execute(&mut transaction)
    .await
    .map_err(|e| {
        DbErrMessage::new(e)
            .unique(ProfileError::EmailTaken)
            .into_err()
    })?;

    transaction.commit().await.context("Transaction failed")?;

    debug!("Updated profile of {user_id}");
    Ok(row.into())
}

/// Replaces the password hash and rotates the session key, which invalidates every
/// token issued before the change. Returns the user with the new key.
pub async fn change_password<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    current: SecretString,
    new: SecretString,
) -> Result<SessionUser, ProfileError> {
    let mut transaction = conn.begin().await.context("Failed to begin transaction")?;

    let (username, email, hash): (String, String, String) = query_as(
        r#"
            select username, email, password from users
            where id = $1
            for update
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to select user credentials")?
    .ok_or(ProfileError::UserNotFound)?;

    if !additions::verify_pass(&hash, &current)? {
        return Err(ProfileError::IncorrectPassword);
    }

    if new.expose_secret().trim().is_empty() {
        return Err(ProfileError::MissingPassword);
    }

    if !additions::pass_is_strong(new.expose_secret(), &[&username, &email]) {
        return Err(ProfileError::WeakPassword);
    }

    let new_hash = additions::hash_pass(&new)?;

    let user = query_as::<_, SessionUser>(
        r#"
            update users
            set password = $2, session_key = gen_random_uuid()
            where id = $1
            returning id, username, session_key
        "#,
    )
    .bind(user_id)
    .bind(new_hash)
    .fetch_one(&mut transaction)
    .await
    .context("Failed to update password")?;

    transaction.commit().await.context("Transaction failed")?;

    debug!("Password changed for {user_id}, sessions rekeyed");
    Ok(user)
}
