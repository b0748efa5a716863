//! Sort key resolution
//!
//! External sort keys are plain strings such as `created_at` or `-created_at`.
//! Each resource registers the keys it accepts; anything else is rejected
//! before a query is built.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::{Error, Result};

/// Direction of a sort directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sortable field of some resource
pub trait SortField: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// Parse the external field name
    fn from_name(name: &str) -> Option<Self>;

    /// External field name
    fn name(&self) -> &'static str;
}

/// Normalized single-field sort: field plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> SortDirective<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse `field` / `-field` without consulting an allow-list
    pub fn parse(key: &str) -> Option<Self> {
        let (name, direction) = match key.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Desc),
            None => (key, SortDirection::Asc),
        };
        F::from_name(name).map(|field| Self { field, direction })
    }

    /// External key for this directive, e.g. `-created_at`
    pub fn key(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.name().to_string(),
            SortDirection::Desc => format!("-{}", self.field.name()),
        }
    }
}

/// Fixed allow-list of sort keys registered for a resource
#[derive(Debug, Clone, Copy)]
pub struct SortOrders<F> {
    keys: &'static [&'static str],
    _field: PhantomData<F>,
}

impl<F: SortField> SortOrders<F> {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self {
            keys,
            _field: PhantomData,
        }
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key)
    }

    /// Resolve a requested key, falling back to `default` when none was given
    pub fn resolve(
        &self,
        requested: Option<&str>,
        default: SortDirective<F>,
    ) -> Result<SortDirective<F>> {
        let Some(key) = requested else {
            return Ok(default);
        };

        if !self.contains(key) {
            return Err(Error::InvalidSortKey(format!(
                "'{}' is not one of: {}",
                key,
                self.keys.join(", ")
            )));
        }

        SortDirective::parse(key)
            .ok_or_else(|| Error::InvalidSortKey(format!("'{}' names an unknown field", key)))
    }
}
