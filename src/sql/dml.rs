//! MERGE statement tree.
//!
//! Databend's MERGE differs from the ANSI form in two ways the compiler has
//! to honour: match-clause predicates are attached with `AND` directly after
//! `WHEN [NOT] MATCHED`, and an empty assignment list means "all columns"
//! (`UPDATE *` / `INSERT *`).
//!
//! # Example
//!
//! ```ignore
//! let merge = Merge::into("dim_customers")
//!     .using_table("staging_customers")
//!     .on(table_col("dim_customers", "customer_id").eq(table_col("staging_customers", "customer_id")))
//!     .when_matched_update(Assignments::new().set("name", table_col("staging_customers", "name")))
//!     .when_not_matched_insert_all();
//!
//! // MERGE INTO dim_customers
//! //  USING (SELECT * FROM staging_customers) AS staging_customers
//! //  ON dim_customers.customer_id = staging_customers.customer_id
//! // WHEN MATCHED THEN
//! //     UPDATE SET "name" = staging_customers.name
//! //  WHEN NOT MATCHED THEN
//! //     INSERT *
//! ```

use super::expr::{lit_bool, Expr};
use super::query::{Query, TableRef};

// ============================================================================
// Assignments
// ============================================================================

/// Ordered `column = expr` pairs.
///
/// Behaves like an insertion-ordered map: setting a column twice replaces
/// the expression but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments(Vec<(String, Expr)>);

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `expr` to `column`.
    pub fn set(mut self, column: impl Into<String>, expr: impl Into<Expr>) -> Self {
        let column = column.into();
        let expr = expr.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = expr,
            None => self.0.push((column, expr)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.0.iter().map(|(c, e)| (c.as_str(), e))
    }

    /// Pairs in insertion order, or sorted by column name when `deterministic`.
    pub fn ordered(&self, deterministic: bool) -> Vec<(&str, &Expr)> {
        let mut pairs: Vec<_> = self.iter().collect();
        if deterministic {
            pairs.sort_by(|a, b| a.0.cmp(b.0));
        }
        pairs
    }
}

impl<C: Into<String>, E: Into<Expr>> FromIterator<(C, E)> for Assignments {
    fn from_iter<I: IntoIterator<Item = (C, E)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Assignments::new(), |acc, (c, e)| acc.set(c, e))
    }
}

// ============================================================================
// MERGE
// ============================================================================

/// Source relation of a MERGE.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeSource {
    /// Bare table; rendered as `(SELECT * FROM t) AS t`.
    Table(TableRef),
    /// SELECT; rendered as a subquery aliased by its first FROM table name.
    Select(Box<Query>),
    /// Already-aliased subquery, rendered as given.
    Subquery { query: Box<Query>, alias: String },
}

/// One `WHEN ...` arm of a MERGE.
#[derive(Debug, Clone, PartialEq)]
pub enum WhenClause {
    /// WHEN MATCHED [AND predicate] THEN UPDATE SET ... / UPDATE *
    MatchedUpdate {
        predicate: Option<Expr>,
        set: Assignments,
    },
    /// WHEN MATCHED [AND predicate] THEN DELETE
    MatchedDelete { predicate: Option<Expr> },
    /// WHEN NOT MATCHED [AND predicate] THEN INSERT (..) VALUES (..) / INSERT *
    NotMatchedInsert {
        predicate: Option<Expr>,
        set: Assignments,
    },
}

impl WhenClause {
    pub fn predicate(&self) -> Option<&Expr> {
        match self {
            WhenClause::MatchedUpdate { predicate, .. }
            | WhenClause::MatchedDelete { predicate }
            | WhenClause::NotMatchedInsert { predicate, .. } => predicate.as_ref(),
        }
    }
}

/// MERGE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Merge {
    pub target: TableRef,
    pub source: MergeSource,
    pub on: Expr,
    pub clauses: Vec<WhenClause>,
}

impl Merge {
    /// Create a new MERGE statement targeting a table.
    pub fn into(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            target: TableRef::new(&table),
            source: MergeSource::Table(TableRef::new(&table)),
            on: lit_bool(true), // Placeholder until on() is called
            clauses: Vec::new(),
        }
    }

    /// Set the target schema.
    pub fn target_schema(mut self, schema: impl Into<String>) -> Self {
        self.target.schema = Some(schema.into());
        self
    }

    /// Set the source to a table.
    pub fn using_table(mut self, table: impl Into<String>) -> Self {
        self.source = MergeSource::Table(TableRef::new(&table.into()));
        self
    }

    /// Set the source to a table with schema.
    pub fn using_table_with_schema(
        mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        self.source = MergeSource::Table(TableRef::new(&table.into()).with_schema(&schema.into()));
        self
    }

    /// Set the source to a SELECT.
    pub fn using_select(mut self, query: Query) -> Self {
        self.source = MergeSource::Select(Box::new(query));
        self
    }

    /// Set the source to an aliased subquery.
    pub fn using_subquery(mut self, query: Query, alias: impl Into<String>) -> Self {
        self.source = MergeSource::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        };
        self
    }

    /// Set the ON condition.
    pub fn on(mut self, condition: Expr) -> Self {
        self.on = condition;
        self
    }

    /// Add a WHEN MATCHED THEN UPDATE clause. Empty assignments mean `UPDATE *`.
    pub fn when_matched_update(self, set: Assignments) -> Self {
        self.when(WhenClause::MatchedUpdate {
            predicate: None,
            set,
        })
    }

    /// Add a WHEN MATCHED AND condition THEN UPDATE clause.
    pub fn when_matched_and_update(self, condition: Expr, set: Assignments) -> Self {
        self.when(WhenClause::MatchedUpdate {
            predicate: Some(condition),
            set,
        })
    }

    /// Add a WHEN MATCHED THEN UPDATE * clause.
    pub fn when_matched_update_all(self) -> Self {
        self.when_matched_update(Assignments::new())
    }

    /// Add a WHEN MATCHED THEN DELETE clause.
    pub fn when_matched_delete(self) -> Self {
        self.when(WhenClause::MatchedDelete { predicate: None })
    }

    /// Add a WHEN MATCHED AND condition THEN DELETE clause.
    pub fn when_matched_and_delete(self, condition: Expr) -> Self {
        self.when(WhenClause::MatchedDelete {
            predicate: Some(condition),
        })
    }

    /// Add a WHEN NOT MATCHED THEN INSERT clause. Empty assignments mean `INSERT *`.
    pub fn when_not_matched_insert(self, set: Assignments) -> Self {
        self.when(WhenClause::NotMatchedInsert {
            predicate: None,
            set,
        })
    }

    /// Add a WHEN NOT MATCHED AND condition THEN INSERT clause.
    pub fn when_not_matched_and_insert(self, condition: Expr, set: Assignments) -> Self {
        self.when(WhenClause::NotMatchedInsert {
            predicate: Some(condition),
            set,
        })
    }

    /// Add a WHEN NOT MATCHED THEN INSERT * clause.
    pub fn when_not_matched_insert_all(self) -> Self {
        self.when_not_matched_insert(Assignments::new())
    }

    /// Add a raw WHEN clause.
    pub fn when(mut self, clause: WhenClause) -> Self {
        self.clauses.push(clause);
        self
    }
}
