//! Scalar column lookup against a content provider.

use crate::error::ProviderError;
use crate::provider::{ContentProvider, Row};

/// Returns the first row matching the query, if any.
pub fn query_first_row<P: ContentProvider + ?Sized>(
    provider: &P,
    target: &str,
    columns: &[&str],
    selection: Option<&str>,
    args: &[&str],
) -> Result<Option<Row>, ProviderError> {
    let rows = provider.query(target, columns, selection, args)?;
    Ok(rows.into_iter().next())
}

/// Value of `column` in the first row matching the query.
///
/// `Ok(None)` when no row matches or the column is absent or null. Provider
/// failures are returned as-is; there are no retries and no pagination.
pub fn query_column<P: ContentProvider + ?Sized>(
    provider: &P,
    target: &str,
    selection: Option<&str>,
    args: &[&str],
    column: &str,
) -> Result<Option<String>, ProviderError> {
    let row = query_first_row(provider, target, &[column], selection, args)?;
    let value = row.and_then(|r| r.get(column).map(str::to_string));
    tracing::debug!(uri = target, column, found = value.is_some(), "column query");
    Ok(value)
}
