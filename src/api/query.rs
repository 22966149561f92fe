//! Listing filters
//!
//! The control plane narrows listings with `q=<field><operator><value>`
//! query parameters. A [`Query`] is one such clause.

use std::fmt;

/// Field a listing can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Name,
    OrganizationGuid,
}

impl Filter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::Name => "name",
            Filter::OrganizationGuid => "organization_guid",
        }
    }
}

/// Comparison applied between a filter field and its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    In,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => ":",
            Operator::In => " IN ",
        }
    }
}

/// A single immutable filter clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub filter: Filter,
    pub operator: Operator,
    pub value: String,
}

impl Query {
    pub fn new(filter: Filter, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            filter,
            operator,
            value: value.into(),
        }
    }

    /// Exact-match clause on the canonical name field
    pub fn name_equals(name: &str) -> Self {
        Self::new(Filter::Name, Operator::Equal, name)
    }

    /// Clause matching any of the given values
    pub fn any_of(filter: Filter, values: &[&str]) -> Self {
        Self::new(filter, Operator::In, values.join(","))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.filter.as_str(),
            self.operator.as_str(),
            self.value
        )
    }
}
