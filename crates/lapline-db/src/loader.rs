use lapline_core::error::AppError;
use lapline_core::table::{CellValue, Column, TableRecord};
use lapline_core::traits::BulkLoader;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

/// PostgreSQL accepts at most this many bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// PostgreSQL truncates identifiers longer than this.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Bulk loader with truncate-then-insert semantics.
///
/// The whole replacement runs in one transaction: an existing table is
/// truncated (structure kept), a missing table is created from the record
/// shape, and all rows are inserted in batches. Any failure drops the
/// transaction, which rolls back and leaves the table as it was.
#[derive(Clone)]
pub struct PgBulkLoader {
    pool: PgPool,
}

impl PgBulkLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the contents of `table` with `records`. Returns rows inserted.
    pub async fn replace<R: TableRecord>(&self, records: &[R], table: &str) -> Result<u64, AppError> {
        let ident = quote_identifier(table)?;
        let columns = R::columns();
        tracing::info!(%table, rows = records.len(), "Loading table");

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        if table_exists(&mut *tx, table).await? {
            sqlx::query(&format!("TRUNCATE TABLE {ident}"))
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
            tracing::debug!(%table, "Truncated existing table");
        } else {
            sqlx::query(&create_table_sql(&ident, columns))
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
            tracing::info!(%table, "Created table");
        }

        let mut written = 0;
        for chunk in records.chunks(rows_per_statement(columns.len())) {
            let mut builder = QueryBuilder::<Postgres>::new(insert_prefix(&ident, columns));
            builder.push_values(chunk, |mut row, record| {
                for value in record.values() {
                    match value {
                        CellValue::BigInt(v) => {
                            row.push_bind(v);
                        }
                        CellValue::Text(v) => {
                            row.push_bind(v);
                        }
                    }
                }
            });

            written += builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(db_error)?
                .rows_affected();
        }

        tx.commit().await.map_err(db_error)?;
        tracing::info!(%table, rows = written, "Successfully loaded table");

        Ok(written)
    }
}

impl BulkLoader for PgBulkLoader {
    async fn load<R: TableRecord>(&self, records: &[R], table: &str) -> Result<u64, AppError> {
        self.replace(records, table).await
    }
}

fn db_error(e: sqlx::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}

async fn table_exists(conn: &mut PgConnection, table: &str) -> Result<bool, AppError> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = $1
        )
        "#,
    )
    .bind(table)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error)?;

    Ok(exists)
}

/// Validate a plain SQL identifier and return it double-quoted.
fn quote_identifier(name: &str) -> Result<String, AppError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || name.len() > MAX_IDENTIFIER_LEN {
        return Err(AppError::DatabaseError(format!(
            "Invalid table name '{name}': expected [A-Za-z_][A-Za-z0-9_]* of at most {MAX_IDENTIFIER_LEN} bytes"
        )));
    }

    Ok(format!("\"{name}\""))
}

fn column_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn create_table_sql(ident: &str, columns: &[Column]) -> String {
    let definitions = columns
        .iter()
        .map(|c| format!("\"{}\" {}", c.name, c.sql_type.as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {ident} ({definitions})")
}

fn insert_prefix(ident: &str, columns: &[Column]) -> String {
    format!("INSERT INTO {ident} ({}) ", column_list(columns))
}

fn rows_per_statement(column_count: usize) -> usize {
    (MAX_BIND_PARAMS / column_count.max(1)).max(1)
}
