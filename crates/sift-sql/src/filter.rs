//! Filter condition compiler.
//!
//! Translates one field predicate into a boolean SQL fragment and its bound
//! values. Temporal values are corrected first, then text values are
//! upper-cased when the predicate folds case.

use crate::correct::ValueCorrector;
use crate::dialect::Dialect;
use crate::metadata::FieldType;
use crate::param::Operator;
use crate::value::{SqlFragment, SqlValue};

/// Compiles field predicates for one dialect and value corrector.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'a> {
    dialect: &'a dyn Dialect,
    corrector: &'a dyn ValueCorrector,
}

impl<'a> FilterCompiler<'a> {
    /// Creates a compiler.
    pub fn new(dialect: &'a dyn Dialect, corrector: &'a dyn ValueCorrector) -> Self {
        Self { dialect, corrector }
    }

    /// Compiles `column <operator> values`.
    ///
    /// Returns `None` when the predicate restricts nothing: a `Between` whose
    /// bounds are both blank, or a `MultiValue` without elements. The caller
    /// leaves such predicates out of the conjunction.
    pub fn compile(
        &self,
        field_type: FieldType,
        column: &str,
        operator: Operator,
        values: &[SqlValue],
        ignore_case: bool,
    ) -> Option<SqlFragment> {
        let mut values = values.to_vec();
        if field_type.is_temporal() {
            values = self.corrector.correct(values, operator);
        }
        if ignore_case {
            values = values.into_iter().map(SqlValue::to_upper_case).collect();
        }

        let folded;
        let col = if ignore_case && operator != Operator::MultiValue {
            folded = self.dialect.case_fold(column);
            folded.as_str()
        } else {
            column
        };

        let fragment = match operator {
            Operator::Equal => compare(col, "=", first_value(column, operator, &values)),
            Operator::NotEqual => compare(col, "!=", first_value(column, operator, &values)),
            Operator::GreaterThan => compare(col, ">", first_value(column, operator, &values)),
            Operator::GreaterEqual => compare(col, ">=", first_value(column, operator, &values)),
            Operator::LessThan => compare(col, "<", first_value(column, operator, &values)),
            Operator::LessEqual => compare(col, "<=", first_value(column, operator, &values)),
            Operator::Include => like(col, first_value(column, operator, &values), "%", "%"),
            Operator::StartWith => like(col, first_value(column, operator, &values), "", "%"),
            Operator::EndWith => like(col, first_value(column, operator, &values), "%", ""),
            Operator::Empty => SqlFragment::new(format!("{} is null", col)),
            Operator::NotEmpty => SqlFragment::new(format!("{} is not null", col)),
            Operator::Between => return between(col, values),
            Operator::MultiValue => {
                return multi_value(self.dialect, column, values, ignore_case);
            }
        };
        Some(fragment)
    }
}

/// The first non-null value. A value-requiring operator without one binds null.
fn first_value(column: &str, operator: Operator, values: &[SqlValue]) -> SqlValue {
    match values.iter().find(|v| !v.is_null()) {
        Some(value) => value.clone(),
        None => {
            tracing::warn!(
                column = %column,
                operator = %operator,
                "operator requires a value but none was supplied, binding null"
            );
            SqlValue::Null
        }
    }
}

fn compare(col: &str, op: &str, value: SqlValue) -> SqlFragment {
    SqlFragment::with_params(format!("{} {} ?", col, op), vec![value])
}

fn like(col: &str, value: SqlValue, prefix: &str, suffix: &str) -> SqlFragment {
    let pattern = match value {
        SqlValue::Null => SqlValue::Null,
        other => SqlValue::Text(format!("{}{}{}", prefix, other, suffix)),
    };
    SqlFragment::with_params(format!("{} like ?", col), vec![pattern])
}

fn between(col: &str, values: Vec<SqlValue>) -> Option<SqlFragment> {
    let mut values = values.into_iter();
    let lower = values.next().filter(|v| !v.is_blank());
    let upper = values.next().filter(|v| !v.is_blank());
    match (lower, upper) {
        (Some(lower), Some(upper)) => Some(SqlFragment::with_params(
            format!("{} between ? and ?", col),
            vec![lower, upper],
        )),
        (Some(lower), None) => Some(compare(col, ">=", lower)),
        (None, Some(upper)) => Some(compare(col, "<=", upper)),
        (None, None) => None,
    }
}

fn multi_value(
    dialect: &dyn Dialect,
    column: &str,
    values: Vec<SqlValue>,
    ignore_case: bool,
) -> Option<SqlFragment> {
    if values.is_empty() {
        return None;
    }
    let branches = values
        .into_iter()
        .map(|value| {
            if value.is_null() {
                SqlFragment::new(format!("{} is null", column))
            } else if ignore_case {
                compare(&dialect.case_fold(column), "=", value)
            } else {
                compare(column, "=", value)
            }
        })
        .collect();
    let joined = SqlFragment::join(branches, " or ");
    Some(SqlFragment::with_params(
        format!("({})", joined.sql),
        joined.params,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::correct::{DateValueCorrector, PassThrough};
    use crate::dialect::MySqlDialect;

    fn compile(
        operator: Operator,
        values: Vec<SqlValue>,
        ignore_case: bool,
    ) -> Option<SqlFragment> {
        FilterCompiler::new(&MySqlDialect, &PassThrough).compile(
            FieldType::Text,
            "t.c",
            operator,
            &values,
            ignore_case,
        )
    }

    #[test]
    fn test_comparison_operators() {
        let cases = [
            (Operator::Equal, "t.c = ?"),
            (Operator::NotEqual, "t.c != ?"),
            (Operator::GreaterThan, "t.c > ?"),
            (Operator::GreaterEqual, "t.c >= ?"),
            (Operator::LessThan, "t.c < ?"),
            (Operator::LessEqual, "t.c <= ?"),
        ];
        for (op, sql) in cases {
            let fragment = compile(op, vec![SqlValue::Integer(5)], false).unwrap();
            assert_eq!(fragment.sql, sql);
            assert_eq!(fragment.params, vec![SqlValue::Integer(5)]);
        }
    }

    #[test]
    fn test_like_patterns() {
        let v = || vec![SqlValue::text("jo")];
        assert_eq!(
            compile(Operator::Include, v(), false).unwrap().params,
            vec![SqlValue::text("%jo%")]
        );
        assert_eq!(
            compile(Operator::StartWith, v(), false).unwrap().params,
            vec![SqlValue::text("jo%")]
        );
        assert_eq!(
            compile(Operator::EndWith, v(), false).unwrap().params,
            vec![SqlValue::text("%jo")]
        );
        assert_eq!(compile(Operator::Include, v(), false).unwrap().sql, "t.c like ?");
    }

    #[test]
    fn test_first_non_null_value_is_used() {
        let fragment = compile(
            Operator::Equal,
            vec![SqlValue::Null, SqlValue::text("x"), SqlValue::text("y")],
            false,
        )
        .unwrap();
        assert_eq!(fragment.params, vec![SqlValue::text("x")]);
    }

    #[test]
    fn test_missing_value_binds_null() {
        let fragment = compile(Operator::Equal, vec![], false).unwrap();
        assert_eq!(fragment.sql, "t.c = ?");
        assert_eq!(fragment.params, vec![SqlValue::Null]);
    }

    #[test]
    fn test_empty_and_not_empty() {
        let fragment = compile(Operator::Empty, vec![SqlValue::text("ignored")], true).unwrap();
        assert_eq!(fragment.sql, "upper(t.c) is null");
        assert!(fragment.params.is_empty());
        assert_eq!(
            compile(Operator::NotEmpty, vec![], false).unwrap().sql,
            "t.c is not null"
        );
    }

    #[test]
    fn test_case_fold() {
        let fragment = compile(Operator::StartWith, vec![SqlValue::text("jo")], true).unwrap();
        assert_eq!(fragment.sql, "upper(t.c) like ?");
        assert_eq!(fragment.params, vec![SqlValue::text("JO%")]);
    }

    #[test]
    fn test_between_truth_table() {
        let five = SqlValue::Integer(5);
        let ten = SqlValue::Integer(10);

        assert_eq!(
            compile(Operator::Between, vec![SqlValue::Null, SqlValue::Null], false),
            None
        );

        let lower_only = compile(Operator::Between, vec![five.clone(), SqlValue::Null], false).unwrap();
        assert_eq!(lower_only.sql, "t.c >= ?");
        assert_eq!(lower_only.params, vec![five.clone()]);

        let upper_only = compile(Operator::Between, vec![SqlValue::Null, ten.clone()], false).unwrap();
        assert_eq!(upper_only.sql, "t.c <= ?");
        assert_eq!(upper_only.params, vec![ten.clone()]);

        let both = compile(Operator::Between, vec![five.clone(), ten.clone()], false).unwrap();
        assert_eq!(both.sql, "t.c between ? and ?");
        assert_eq!(both.params, vec![five, ten]);
    }

    #[test]
    fn test_between_blank_strings_are_empty() {
        assert_eq!(
            compile(Operator::Between, vec![SqlValue::text(""), SqlValue::text(" ")], false),
            None
        );
        let upper_only =
            compile(Operator::Between, vec![SqlValue::text(""), SqlValue::text("m")], false).unwrap();
        assert_eq!(upper_only.sql, "t.c <= ?");
        assert_eq!(compile(Operator::Between, vec![], false), None);
    }

    #[test]
    fn test_multi_value_with_null_branch() {
        let fragment = compile(
            Operator::MultiValue,
            vec![SqlValue::text("a"), SqlValue::Null, SqlValue::text("b")],
            true,
        )
        .unwrap();
        assert_eq!(
            fragment.sql,
            "(upper(t.c) = ? or t.c is null or upper(t.c) = ?)"
        );
        assert_eq!(fragment.params, vec![SqlValue::text("A"), SqlValue::text("B")]);
    }

    #[test]
    fn test_multi_value_without_fold() {
        let fragment = compile(
            Operator::MultiValue,
            vec![SqlValue::Integer(1), SqlValue::Integer(2)],
            false,
        )
        .unwrap();
        assert_eq!(fragment.sql, "(t.c = ? or t.c = ?)");
        assert_eq!(compile(Operator::MultiValue, vec![], false), None);
    }

    #[test]
    fn test_temporal_values_are_corrected() {
        let fragment = FilterCompiler::new(&MySqlDialect, &DateValueCorrector)
            .compile(
                FieldType::Date,
                "o.created",
                Operator::Between,
                &[SqlValue::text("2024-01-01"), SqlValue::text("2024-01-31")],
                false,
            )
            .unwrap();
        let day = |d, h, m, s| {
            SqlValue::Timestamp(
                NaiveDate::from_ymd_opt(2024, 1, d)
                    .unwrap()
                    .and_hms_opt(h, m, s)
                    .unwrap(),
            )
        };
        assert_eq!(fragment.sql, "o.created between ? and ?");
        assert_eq!(fragment.params, vec![day(1, 0, 0, 0), day(31, 23, 59, 59)]);
    }

    #[test]
    fn test_temporal_multi_value_branches_start_of_day() {
        let fragment = FilterCompiler::new(&MySqlDialect, &DateValueCorrector)
            .compile(
                FieldType::Date,
                "o.created",
                Operator::MultiValue,
                &[SqlValue::text("2024-03-01"), SqlValue::Null, SqlValue::text("2024-03-15")],
                false,
            )
            .unwrap();
        let midnight = |d| {
            SqlValue::Timestamp(NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
        };
        assert_eq!(
            fragment.sql,
            "(o.created = ? or o.created is null or o.created = ?)"
        );
        assert_eq!(fragment.params, vec![midnight(1), midnight(15)]);
    }

    #[test]
    fn test_time_of_day_bound_as_given() {
        let fragment = FilterCompiler::new(&MySqlDialect, &DateValueCorrector)
            .compile(
                FieldType::Time,
                "s.starts_at",
                Operator::GreaterEqual,
                &[SqlValue::text("10:30:00")],
                false,
            )
            .unwrap();
        assert_eq!(fragment.sql, "s.starts_at >= ?");
        assert_eq!(fragment.params, vec![SqlValue::text("10:30:00")]);
    }

    #[test]
    fn test_non_temporal_values_skip_correction() {
        let fragment = FilterCompiler::new(&MySqlDialect, &DateValueCorrector)
            .compile(
                FieldType::Text,
                "o.code",
                Operator::Equal,
                &[SqlValue::text("2024-01-01")],
                false,
            )
            .unwrap();
        assert_eq!(fragment.params, vec![SqlValue::text("2024-01-01")]);
    }
}
