use crate::configuration::PostgresSettings;
use anyhow::{anyhow, Context};
use sqlx::migrate;
pub use sqlx::PgPool;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

pub async fn get_postgres_pool(config: PostgresSettings) -> anyhow::Result<PgPool> {
    let pool = PgPool::connect(&config.get_connection_string()?)
        .await
        .context("Cannot establish postgres connection")?;
    if config.is_migrating() {
        migrate!("./migrations")
            .run(&pool)
            .await
            .context("Auto migration failed")?;
    }
    Ok(pool)
}

/// Maps postgres constraint violations onto a component error, falling back to
/// `E::from(anyhow)` for everything else.
pub struct DbErrMessage<E> {
    err: E,
    code: Option<String>,
    constraint: Option<String>,
}

impl<E: From<anyhow::Error>> DbErrMessage<E> {
    pub fn new(err: sqlx::Error) -> Self {
        let (code, constraint) = match err.as_database_error() {
            Some(e) => (
                e.code().map(|c| c.into_owned()),
                e.constraint().map(str::to_string),
            ),
            None => (None, None),
        };

        Self {
            err: E::from(anyhow!(err)),
            code,
            constraint,
        }
    }

    fn is(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    pub fn unique(mut self, mapped: E) -> Self {
        if self.is(UNIQUE_VIOLATION) {
            self.err = mapped;
        }
        self
    }

    /// Like [`Self::unique`], limited to one named constraint.
    pub fn unique_on(mut self, constraint: &str, mapped: E) -> Self {
        if self.is(UNIQUE_VIOLATION) && self.constraint.as_deref() == Some(constraint) {
            self.err = mapped;
        }
        self
    }

    pub fn fk(mut self, mapped: E) -> Self {
        if self.is(FOREIGN_KEY_VIOLATION) {
            self.err = mapped;
        }
        self
    }

    pub fn check(mut self, mapped: E) -> Self {
        if self.is(CHECK_VIOLATION) {
            self.err = mapped;
        }
        self
    }

    pub fn into_err(self) -> E {
        self.err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Conflict,
        Unexpected(anyhow::Error),
    }

    impl From<anyhow::Error> for TestError {
        fn from(e: anyhow::Error) -> Self {
            Self::Unexpected(e)
        }
    }

    #[test]
    fn non_database_errors_stay_unexpected() {
        let err = DbErrMessage::<TestError>::new(sqlx::Error::RowNotFound)
            .unique(TestError::Conflict)
            .fk(TestError::Conflict)
            .check(TestError::Conflict)
            .into_err();

        match err {
            TestError::Unexpected(_) => (),
            other => panic!("Test gives the result {other:?}"),
        }
    }
}
