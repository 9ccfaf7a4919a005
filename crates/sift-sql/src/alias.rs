//! Collision-free alias generation.
//!
//! Synthetic names (the subquery table of a distinct count, the count column,
//! per-field sum columns) must not clash with anything already present in the
//! SQL they are added to. The allocator probes `seed`, `seed0`, `seed1`, ...
//! until a candidate does not occur anywhere in the existing text.

/// Seed for the derived table wrapping a distinct or grouped query.
pub const TABLE_SEED: &str = "tbl_";

/// Prefix for synthetic aggregate columns.
pub const COLUMN_PREFIX: &str = "col_";

/// Returns the first of `seed`, `seed0`, `seed1`, ... that is not a substring
/// of `existing`.
pub fn allocate(seed: &str, existing: &str) -> String {
    let mut candidate = seed.to_string();
    let mut index: u64 = 0;
    while existing.contains(&candidate) {
        tracing::trace!(candidate = %candidate, "alias collides with existing sql");
        candidate = format!("{}{}", seed, index);
        index += 1;
    }
    candidate
}

/// Allocates the alias of a derived table.
pub fn table_alias(existing: &str) -> String {
    allocate(TABLE_SEED, existing)
}

/// Allocates the alias of a synthetic column seeded by `name`.
pub fn column_alias(name: &str, existing: &str) -> String {
    allocate(&format!("{}{}", COLUMN_PREFIX, name), existing)
}
