//! Per-request search parameters.
//!
//! A [`SearchParam`] says what to fetch (list, total, per-field sums), how to
//! filter ([`FieldParam`]), how to order ([`OrderParam`]) and which page to
//! return ([`PageParam`]). It also carries the values of parameters embedded
//! in metadata snippets.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::snippet::ParamLookup;
use crate::value::SqlValue;

/// Filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `C = v`
    Equal,
    /// `C != v`
    NotEqual,
    /// `C > v`
    GreaterThan,
    /// `C >= v`
    GreaterEqual,
    /// `C < v`
    LessThan,
    /// `C <= v`
    LessEqual,
    /// `C like %v%`
    Include,
    /// `C like v%`
    StartWith,
    /// `C like %v`
    EndWith,
    /// `C between v0 and v1`, open on a blank side.
    Between,
    /// `C is null`
    Empty,
    /// `C is not null`
    NotEmpty,
    /// `C = v0 or C = v1 ...`
    MultiValue,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 13] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterEqual,
        Operator::LessThan,
        Operator::LessEqual,
        Operator::Include,
        Operator::StartWith,
        Operator::EndWith,
        Operator::Between,
        Operator::Empty,
        Operator::NotEmpty,
        Operator::MultiValue,
    ];

    /// The short code accepted by [`Operator::from_str`].
    pub fn code(&self) -> &'static str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::GreaterThan => "gt",
            Operator::GreaterEqual => "ge",
            Operator::LessThan => "lt",
            Operator::LessEqual => "le",
            Operator::Include => "il",
            Operator::StartWith => "sw",
            Operator::EndWith => "ew",
            Operator::Between => "bt",
            Operator::Empty => "ey",
            Operator::NotEmpty => "ny",
            Operator::MultiValue => "mv",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Operator {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.code() == s || op.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| SearchError::UnknownOperator {
                operator: s.to_string(),
            })
    }
}

/// A predicate on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldParam {
    /// The field name.
    pub name: String,
    /// The operator.
    pub operator: Operator,
    /// Raw values; their meaning depends on the operator.
    pub values: Vec<SqlValue>,
    /// Compare case-insensitively.
    pub ignore_case: bool,
}

impl FieldParam {
    /// Creates a case-sensitive predicate.
    pub fn new(name: impl Into<String>, operator: Operator, values: Vec<SqlValue>) -> Self {
        Self {
            name: name.into(),
            operator,
            values,
            ignore_case: false,
        }
    }

    /// Sets case-insensitive comparison.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }
}

/// Which statements a request needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchType {
    /// Fetch the paginated list.
    pub list: bool,
    /// Fetch the total row count.
    pub total: bool,
    /// Fields to sum.
    #[serde(default)]
    pub summary_fields: Vec<String>,
}

impl FetchType {
    /// List and total count.
    pub fn all() -> Self {
        Self {
            list: true,
            total: true,
            summary_fields: Vec::new(),
        }
    }

    /// The list only.
    pub fn list_only() -> Self {
        Self {
            list: true,
            total: false,
            summary_fields: Vec::new(),
        }
    }

    /// The total count only.
    pub fn total_only() -> Self {
        Self {
            list: false,
            total: true,
            summary_fields: Vec::new(),
        }
    }

    /// Adds summary fields.
    pub fn with_summary<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.summary_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Returns true if an aggregate (cluster) statement is needed.
    pub fn should_query_cluster(&self) -> bool {
        self.total || !self.summary_fields.is_empty()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => write!(f, "asc"),
            Order::Desc => write!(f, "desc"),
        }
    }
}

/// An order directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderParam {
    /// The field to sort by.
    pub sort: String,
    /// The direction; the database default when absent.
    pub order: Option<Order>,
}

impl OrderParam {
    /// Parses a sort value, where a leading `-` means descending (e.g. `-age`).
    pub fn parse(s: &str) -> Self {
        if let Some(stripped) = s.strip_prefix('-') {
            Self {
                sort: stripped.to_string(),
                order: Some(Order::Desc),
            }
        } else {
            Self {
                sort: s.to_string(),
                order: None,
            }
        }
    }

    /// An ascending order on `sort`.
    pub fn asc(sort: impl Into<String>) -> Self {
        Self {
            sort: sort.into(),
            order: Some(Order::Asc),
        }
    }

    /// A descending order on `sort`.
    pub fn desc(sort: impl Into<String>) -> Self {
        Self {
            sort: sort.into(),
            order: Some(Order::Desc),
        }
    }
}

/// The page to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageParam {
    /// Rows to skip.
    pub offset: u64,
    /// Rows to return; unbounded when absent.
    pub max: Option<u64>,
}

impl PageParam {
    /// A page of `max` rows starting at `offset`.
    pub fn new(offset: u64, max: u64) -> Self {
        Self {
            offset,
            max: Some(max),
        }
    }

    /// No pagination.
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// A complete search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParam {
    /// What to fetch.
    pub fetch: FetchType,
    /// Field predicates, in request order.
    pub field_params: Vec<FieldParam>,
    /// Ordering.
    pub order: Option<OrderParam>,
    /// Pagination.
    pub page: PageParam,
    /// Values of parameters embedded in metadata snippets.
    pub embed_params: HashMap<String, SqlValue>,
}

impl SearchParam {
    /// Creates a request with the given fetch type and no predicates.
    pub fn new(fetch: FetchType) -> Self {
        Self {
            fetch,
            ..Default::default()
        }
    }

    /// Adds a predicate.
    pub fn with_field_param(mut self, param: FieldParam) -> Self {
        self.field_params.push(param);
        self
    }

    /// Sets the order.
    pub fn with_order(mut self, order: OrderParam) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the page.
    pub fn with_page(mut self, page: PageParam) -> Self {
        self.page = page;
        self
    }

    /// Sets an embedded parameter value.
    pub fn with_embed_param(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.embed_params.insert(name.into(), value.into());
        self
    }
}

impl ParamLookup for SearchParam {
    fn param(&self, name: &str) -> Option<&SqlValue> {
        self.embed_params.get(name)
    }
}
