//! Tabular shape of records handed to a [`BulkLoader`](crate::traits::BulkLoader).
//!
//! Loaders never see concrete record types. They read the column list to
//! create a destination table and pull one [`CellValue`] per column for
//! every row they insert.

/// SQL type of a destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Text,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Text => "TEXT",
        }
    }
}

/// A named, typed destination column. All columns are nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: ColumnType) -> Self {
        Self { name, sql_type }
    }
}

/// One cell of a row. `Text(None)` is stored as SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    BigInt(i64),
    Text(Option<String>),
}

/// A flat record that can be written as one row of a table.
pub trait TableRecord: Send + Sync {
    /// Ordered column list shared by every row of this type.
    fn columns() -> &'static [Column];

    /// Cell values in the same order as [`columns`](Self::columns).
    fn values(&self) -> Vec<CellValue>;
}
