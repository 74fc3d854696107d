pub mod category;
pub mod destination;
pub mod page;
pub mod product;
pub mod region;
pub mod toko;
pub mod transaction;
pub mod user;

/// Trims `value` and fails with `"<field> empty"` when nothing is left.
pub(crate) fn required(field: &str, value: &str) -> anyhow::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{field} empty");
    }
    Ok(trimmed.to_string())
}

/// Like [`required`] for optional patch fields: `None` stays `None`.
pub(crate) fn optional(field: &str, value: Option<&str>) -> anyhow::Result<Option<String>> {
    value.map(|v| required(field, v)).transpose()
}
