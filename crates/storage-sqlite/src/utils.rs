//! Utility functions for SQLite storage operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tradeboard_core::{Error, Result};

/// Rows per multi-row INSERT, kept well under SQLite's bound-parameter limit.
pub const SQLITE_INSERT_CHUNK: usize = 500;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Chunk a slice into smaller slices for batch SQLite statements.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_INSERT_CHUNK)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Stored TEXT that fails to parse is a corrupt row, not bad user input.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::Repository(format!("Stored date '{}' is invalid: {}", value, e)))
}

pub fn parse_decimal(value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| Error::Repository(format!("Stored decimal '{}' is invalid: {}", value, e)))
}

pub fn parse_optional_decimal(value: Option<&str>) -> Result<Option<Decimal>> {
    value.map(parse_decimal).transpose()
}
