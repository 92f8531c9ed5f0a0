use super::normalize::Row;

/// Rows whose configured fields contain `query`, case-folded. The query is
/// matched as typed, whitespace included; only an empty query keeps every row.
pub fn filter_rows(rows: &[Row], query: &str, fields: &[&str]) -> Vec<Row> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| row_matches(row, &needle, fields))
        .cloned()
        .collect()
}

fn row_matches(row: &Row, needle: &str, fields: &[&str]) -> bool {
    fields.iter().any(|field| {
        row.field(field)
            .map(|value| value.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}
