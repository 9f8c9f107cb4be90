// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Composable spot predicates.
//!
//! A [`SpotFilter`] is a conjunction of equality and substring predicates on
//! spot columns, rendered to a parameterized SQL `WHERE` clause.

use crate::models::SpotCategory;

/// Filterable spot column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotField {
    Category,
    Name,
    Location,
    Activity,
    Hours,
    NoiseLevel,
    Seating,
    Amenities,
}

impl SpotField {
    fn column(&self) -> &'static str {
        match self {
            SpotField::Category => "category",
            SpotField::Name => "name",
            SpotField::Location => "location",
            SpotField::Activity => "activity",
            SpotField::Hours => "hours",
            SpotField::NoiseLevel => "noise_level",
            SpotField::Seating => "seating",
            SpotField::Amenities => "amenities",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpotPredicate {
    /// Exact (case-sensitive) match
    Equals(SpotField, String),
    /// Substring match, ASCII case-insensitive (SQLite `LIKE`)
    Contains(SpotField, String),
}

/// Conjunction of spot predicates. An empty filter matches every spot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotFilter {
    predicates: Vec<SpotPredicate>,
}

impl SpotFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(self, category: SpotCategory) -> Self {
        self.eq(SpotField::Category, category.as_str())
    }

    pub fn eq(mut self, field: SpotField, value: impl Into<String>) -> Self {
        self.predicates
            .push(SpotPredicate::Equals(field, value.into()));
        self
    }

    pub fn contains(mut self, field: SpotField, value: impl Into<String>) -> Self {
        self.predicates
            .push(SpotPredicate::Contains(field, value.into()));
        self
    }

    /// Add an equality predicate only when `value` is present.
    pub fn eq_opt(self, field: SpotField, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    /// Add a substring predicate only when `value` is present.
    pub fn contains_opt(self, field: SpotField, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.contains(field, v),
            None => self,
        }
    }

    pub fn predicates(&self) -> &[SpotPredicate] {
        &self.predicates
    }

    /// Render as ` WHERE ...` (empty when unfiltered) plus positional parameters.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        if self.predicates.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut clauses = Vec::with_capacity(self.predicates.len());
        let mut params = Vec::with_capacity(self.predicates.len());

        for (i, predicate) in self.predicates.iter().enumerate() {
            let n = i + 1;
            match predicate {
                SpotPredicate::Equals(field, value) => {
                    clauses.push(format!("{} = ?{n}", field.column()));
                    params.push(value.clone());
                }
                SpotPredicate::Contains(field, value) => {
                    clauses.push(format!(
                        "{} LIKE '%' || ?{n} || '%' ESCAPE '\\'",
                        field.column()
                    ));
                    params.push(escape_like(value));
                }
            }
        }

        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

/// Escape `LIKE` wildcards so the value matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
