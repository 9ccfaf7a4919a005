//! Assertion helpers for produced statements.

use sift_sql::SqlValue;

/// Asserts that `sql` has exactly one bound value per `?` placeholder.
///
/// # Panics
///
/// Panics if the counts differ.
pub fn assert_binds_match(sql: &str, params: &[SqlValue]) {
    let placeholders = sql.matches('?').count();
    assert_eq!(
        placeholders,
        params.len(),
        "placeholder count mismatch in `{}`: {} placeholders, {} values",
        sql,
        placeholders,
        params.len()
    );
}

/// Asserts that no alias in `aliases` repeats.
pub fn assert_unique(aliases: &[&str]) {
    for (i, a) in aliases.iter().enumerate() {
        assert!(
            !aliases[i + 1..].contains(a),
            "alias `{}` appears more than once in {:?}",
            a,
            aliases
        );
    }
}
