//! Data access gateway.
//!
//! Every statement the application sends goes through [`Gateway`]. Each call
//! acquires its own pooled connection and returns it on every exit path.
//! Reads report failure as `None` after logging; writes return
//! [`GatewayError`] so callers can classify what the engine said.

use lazy_static::lazy_static;
use regex::Regex;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Arguments, Decode, FromRow, PgPool, Postgres, Type};
use tracing::{debug, error};

use crate::metrics::{record_query_failure, QueryTimer};

lazy_static! {
    static ref ROUTINE_NAME: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex");
    static ref TARGET_RELATION: Regex =
        Regex::new(r"(?i)\b(?:from|into|update)\s+([A-Za-z_][A-Za-z0-9_]*)").expect("static regex");
}

/// A value bound to a `$n` placeholder.
///
/// `Null` is sent as a text-typed NULL; cast the placeholder in SQL
/// (`$2::int`) when the target column has another type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    BigInt(i64),
    Text(String),
    Date(chrono::NaiveDate),
    Null,
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::BigInt(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<chrono::NaiveDate> for SqlParam {
    fn from(value: chrono::NaiveDate) -> Self {
        SqlParam::Date(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

/// Failure of a write or routine call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// The database could not be reached (pool timeout, I/O, TLS, closed pool).
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected the statement; trigger rejections land here.
    #[error("{message}")]
    Engine {
        /// SQLSTATE, when the engine supplied one.
        code: Option<String>,
        message: String,
    },
}

impl GatewayError {
    pub fn code(&self) -> Option<&str> {
        match self {
            GatewayError::Engine { code, .. } => code.as_deref(),
            GatewayError::Unavailable(_) => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, GatewayError::Unavailable(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            GatewayError::Unavailable(_) => "unavailable",
            GatewayError::Engine { .. } => "engine",
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => GatewayError::Engine {
                code: db_err.code().map(|c| c.into_owned()),
                message: db_err.message().to_string(),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => GatewayError::Unavailable(err.to_string()),
            other => GatewayError::Engine {
                code: None,
                message: other.to_string(),
            },
        }
    }
}

/// Parameterized access to the course database.
#[derive(Clone)]
pub struct Gateway {
    pool: PgPool,
}

impl Gateway {
    /// Creates a new Gateway with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a read query and returns every row in result order.
    ///
    /// `None` means the query failed; an empty result is `Some(vec![])`.
    pub async fn query_all<T>(&self, sql: &str, params: &[SqlParam]) -> Option<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let timer = QueryTimer::new(statement_label(sql));
        let result = self.fetch_all::<T>(sql, params).await;
        self.finish_read(timer, sql, params, result)
    }

    /// Runs a read query and returns its first row, if any.
    ///
    /// `None` means the query failed; `Some(None)` means no row matched.
    pub async fn query_one<T>(&self, sql: &str, params: &[SqlParam]) -> Option<Option<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let timer = QueryTimer::new(statement_label(sql));
        let result = self.fetch_optional::<T>(sql, params).await;
        self.finish_read(timer, sql, params, result)
    }

    /// Runs an INSERT, UPDATE or DELETE in its own transaction.
    ///
    /// Commits and returns the affected row count on success. Any error,
    /// trigger rejections included, rolls the transaction back.
    pub async fn run_mutation(&self, sql: &str, params: &[SqlParam]) -> Result<u64, GatewayError> {
        let timer = QueryTimer::new(statement_label(sql));
        let result = self.execute_in_transaction(sql, params).await;

        if let Err(err) = &result {
            record_query_failure(timer.name(), err.kind());
            if err.is_unavailable() {
                error!(sql = %sql, params = ?params, error = %err, "Mutation failed: database unavailable");
            } else {
                debug!(
                    sql = %sql,
                    params = ?params,
                    code = ?err.code(),
                    error = %err,
                    "Mutation rejected by the database"
                );
            }
        }
        timer.record();
        result
    }

    /// Invokes a set-returning routine as `SELECT * FROM name($1, ...)` in a transaction.
    ///
    /// Returns one inner vector per result set. `None` on failure or an invalid name.
    pub async fn call_procedure<T>(&self, name: &str, params: &[SqlParam]) -> Option<Vec<Vec<T>>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = routine_sql("SELECT * FROM", name, "", params.len())?;
        let timer = QueryTimer::new(format!("call:{}", name));

        let result = async {
            let mut tx = self.pool.begin().await?;
            let rows = match sqlx::query_as_with::<_, T, _>(&sql, bind_all(params))
                .fetch_all(&mut *tx)
                .await
            {
                Ok(rows) => rows,
                Err(err) => {
                    let _ = tx.rollback().await;
                    return Err(GatewayError::from(err));
                }
            };
            tx.commit().await?;
            Ok::<_, GatewayError>(vec![rows])
        }
        .await;

        self.finish_read(timer, &sql, params, result)
    }

    /// Invokes a scalar routine as `SELECT name($1, ...) AS result`.
    ///
    /// `None` on failure or an invalid name; `Some(None)` when the routine returns NULL.
    pub async fn call_function<T>(&self, name: &str, params: &[SqlParam]) -> Option<Option<T>>
    where
        T: for<'r> Decode<'r, Postgres> + Type<Postgres> + Send + Unpin,
    {
        let sql = routine_sql("SELECT", name, " AS result", params.len())?;
        let timer = QueryTimer::new(format!("call:{}", name));

        let result = async {
            let mut conn = self.pool.acquire().await?;
            let value = sqlx::query_scalar_with::<_, Option<T>, _>(&sql, bind_all(params))
                .fetch_one(&mut *conn)
                .await?;
            Ok::<_, GatewayError>(value)
        }
        .await;

        self.finish_read(timer, &sql, params, result)
    }

    async fn fetch_all<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<T>, GatewayError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as_with::<_, T, _>(sql, bind_all(params))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<T>, GatewayError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as_with::<_, T, _>(sql, bind_all(params))
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn execute_in_transaction(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<u64, GatewayError> {
        let mut tx = self.pool.begin().await?;
        match sqlx::query_with(sql, bind_all(params))
            .execute(&mut *tx)
            .await
        {
            Ok(done) => {
                tx.commit().await?;
                Ok(done.rows_affected())
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err.into())
            }
        }
    }

    fn finish_read<R>(
        &self,
        timer: QueryTimer,
        sql: &str,
        params: &[SqlParam],
        result: Result<R, GatewayError>,
    ) -> Option<R> {
        let outcome = match result {
            Ok(value) => Some(value),
            Err(err) => {
                record_query_failure(timer.name(), err.kind());
                error!(
                    sql = %sql,
                    params = ?params,
                    code = ?err.code(),
                    error = %err,
                    "Database query failed"
                );
                None
            }
        };
        timer.record();
        outcome
    }
}

/// Builds a routine call statement, refusing names that are not plain identifiers.
fn routine_sql(prefix: &str, name: &str, suffix: &str, arity: usize) -> Option<String> {
    if !ROUTINE_NAME.is_match(name) {
        error!(routine = %name, "Refusing to call routine with invalid name");
        return None;
    }
    let placeholders = (1..=arity)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("{} {}({}){}", prefix, name, placeholders, suffix))
}

fn bind_all(params: &[SqlParam]) -> PgArguments {
    let mut args = PgArguments::default();
    for param in params {
        match param {
            SqlParam::Int(v) => args.add(*v),
            SqlParam::BigInt(v) => args.add(*v),
            SqlParam::Text(v) => args.add(v.clone()),
            SqlParam::Date(v) => args.add(*v),
            SqlParam::Null => args.add(Option::<String>::None),
        }
    }
    args
}

/// Metric label for a statement: its verb and first target relation.
fn statement_label(sql: &str) -> String {
    let verb = sql
        .split_whitespace()
        .next()
        .unwrap_or("query")
        .to_lowercase();
    match TARGET_RELATION.captures(sql).and_then(|c| c.get(1)) {
        Some(relation) => format!("{}:{}", verb, relation.as_str().to_lowercase()),
        None => verb,
    }
}
