//! Query builder - construct SELECT statements with a fluent API.
//!
//! The builder only records structure. The
//! [`StatementCompiler`](crate::compiler::StatementCompiler) decides how each
//! piece renders for Databend (DISTINCT ON degrades to DISTINCT, FOR UPDATE
//! is dropped).

use super::expr::{Expr, ExprExt};

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A table reference with optional schema and alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            schema: None,
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name this reference is visible under: the alias, else the table name.
    pub fn visible_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Option<Expr>,
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// NULLS ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: Option<SortDir>,
    pub nulls: Option<NullsOrder>,
}

impl OrderByExpr {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            dir: None,
            nulls: None,
        }
    }

    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Asc),
            nulls: None,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Desc),
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }
}

// =============================================================================
// LIMIT / OFFSET
// =============================================================================

/// LIMIT and OFFSET clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LimitOffset {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

// =============================================================================
// Query Builder
// =============================================================================

/// DISTINCT variants a caller can request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Distinct {
    #[default]
    None,
    All,
    /// PostgreSQL-style `DISTINCT ON (..)`; Databend renders plain DISTINCT.
    On(Vec<Expr>),
}

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub distinct: Distinct,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit_offset: Option<LimitOffset>,
    /// Row locking request. Databend has none; never rendered.
    pub for_update: bool,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// SELECT *
    pub fn select_star(mut self) -> Self {
        self.select = vec![SelectExpr::new(super::expr::star())];
        self
    }

    /// Add DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = Distinct::All;
        self
    }

    /// Add DISTINCT ON (exprs).
    pub fn distinct_on(mut self, exprs: Vec<Expr>) -> Self {
        self.distinct = Distinct::On(exprs);
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Add a JOIN.
    pub fn join(mut self, join_type: JoinType, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join {
            join_type,
            table,
            on: Some(on),
        });
        self
    }

    /// Add an INNER JOIN.
    pub fn inner_join(self, table: TableRef, on: Expr) -> Self {
        self.join(JoinType::Inner, table, on)
    }

    /// Add a LEFT JOIN.
    pub fn left_join(self, table: TableRef, on: Expr) -> Self {
        self.join(JoinType::Left, table, on)
    }

    /// Add a CROSS JOIN.
    pub fn cross_join(mut self, table: TableRef) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Cross,
            table,
            on: None,
        });
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set the HAVING clause.
    pub fn having(mut self, condition: Expr) -> Self {
        self.having = Some(condition);
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_offset.get_or_insert_with(LimitOffset::default).limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.limit_offset.get_or_insert_with(LimitOffset::default).offset = Some(offset);
        self
    }

    /// Request FOR UPDATE.
    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    /// Name of the first FROM source, used to alias this query as a subquery.
    pub fn first_from_name(&self) -> Option<&str> {
        self.from.as_ref().map(|t| t.table.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::expr::col;

    #[test]
    fn test_filter_ands_conditions() {
        let q = Query::new()
            .from(TableRef::new("orders"))
            .filter(col("a").eq(1))
            .filter(col("b").eq(2));
        assert!(matches!(q.where_clause, Some(Expr::BinaryOp { .. })));
    }

    #[test]
    fn test_limit_then_offset_share_clause() {
        let q = Query::new().limit(10).offset(5);
        assert_eq!(
            q.limit_offset,
            Some(LimitOffset {
                limit: Some(10),
                offset: Some(5)
            })
        );
    }

    #[test]
    fn test_first_from_name_ignores_alias() {
        let q = Query::new().from(TableRef::new("orders").with_alias("o"));
        assert_eq!(q.first_from_name(), Some("orders"));
    }
}
