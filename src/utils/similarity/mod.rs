pub mod errors;
pub mod models;
pub mod ranking;

use anyhow::Context;
use errors::SimilarityError;
use models::{CandidateRow, FoundUser, SimilarUsersPage, SimilarityFilter};
use sqlx::{query_as, Acquire, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

const SEARCH_LIMIT: i64 = 20;

/// Every other user with the number of hobbies they share with `user_id`.
pub async fn fetch_candidates<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<CandidateRow>, SimilarityError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let candidates = query_as::<_, CandidateRow>(
        r#"
            select users.id, users.name, users.date_of_birth,
                   count(mine.hobby_id) as common_hobbies
            from users
            left join user_hobbies theirs on theirs.user_id = users.id
            left join user_hobbies mine
                on mine.hobby_id = theirs.hobby_id and mine.user_id = $1
            where users.id <> $1
            group by users.id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch similarity candidates")?;

    Ok(candidates)
}

pub async fn similar_users<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    filter: SimilarityFilter,
) -> Result<SimilarUsersPage, SimilarityError> {
    let candidates = fetch_candidates(conn, user_id).await?;
    let reference_year = OffsetDateTime::now_utc().year();

    Ok(ranking::rank_candidates(candidates, &filter, reference_year))
}

/// Case-insensitive username substring search, excluding the searcher.
pub async fn search_users<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    search: &str,
) -> Result<Vec<FoundUser>, SimilarityError> {
    let search = search.trim();
    if search.is_empty() {
        return Ok(Vec::new());
    }

    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let pattern = format!("%{}%", escape_like(search));
    let users = query_as::<_, FoundUser>(
        r#"
            select id, username from users
            where username ilike $1 and id <> $2
            order by username
            limit $3
        "#,
    )
    .bind(pattern)
    .bind(user_id)
    .bind(SEARCH_LIMIT)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to search users")?;

    Ok(users)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("jeff"), "jeff");
        assert_eq!(escape_like("100%_\\"), "100\\%\\_\\\\");
    }
}
