//! Expression, SELECT and MERGE rendering.

use tracing::warn;

use crate::dialect::IdentifierPreparer;
use crate::driver::{ParamStyle, Params, Value};
use crate::error::{DialectError, Result};
use crate::sql::dml::{Merge, MergeSource, WhenClause};
use crate::sql::expr::{BinaryOperator, Expr, Func, Literal, UnaryOperator};
use crate::sql::query::{
    Distinct, Join, JoinType, LimitOffset, NullsOrder, OrderByExpr, Query, SelectExpr, SortDir,
    TableRef,
};
use crate::sql::token::{Token, TokenStream};
use crate::types::{render_plain_literal, DatabendType, SqlType, TypeWrapper};

use super::{CompileOptions, Compiled, TypeCompiler};

/// Renders expression trees, SELECT and MERGE statements as Databend SQL.
#[derive(Debug, Clone)]
pub struct StatementCompiler {
    preparer: IdentifierPreparer,
    types: TypeCompiler,
    param_style: ParamStyle,
    supports_cast: bool,
    options: CompileOptions,
}

impl Default for StatementCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementCompiler {
    pub fn new() -> Self {
        Self {
            preparer: IdentifierPreparer::new(),
            types: TypeCompiler::new(),
            param_style: ParamStyle::default(),
            supports_cast: true,
            options: CompileOptions::default(),
        }
    }

    pub fn with_param_style(mut self, style: ParamStyle) -> Self {
        self.param_style = style;
        self
    }

    /// When false, CAST nodes render as their inner expression.
    pub fn with_supports_cast(mut self, supports_cast: bool) -> Self {
        self.supports_cast = supports_cast;
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn preparer(&self) -> &IdentifierPreparer {
        &self.preparer
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Render a single expression.
    pub fn compile_expr(&self, expr: &Expr) -> Result<Compiled> {
        let mut ts = TokenStream::new();
        let mut params = Params::new();
        self.expr_tokens(expr, &mut ts, &mut params)?;
        Ok(self.finish(&ts, params))
    }

    /// Render a SELECT statement.
    pub fn compile_query(&self, query: &Query) -> Result<Compiled> {
        let mut ts = TokenStream::new();
        let mut params = Params::new();
        self.query_tokens(query, &mut ts, &mut params)?;
        Ok(self.finish(&ts, params))
    }

    /// Render a MERGE statement.
    ///
    /// Layout:
    ///
    /// ```text
    /// MERGE INTO <target>
    ///  USING <source>
    ///  ON <predicate>
    /// <clause>
    ///  <clause>
    /// ```
    pub fn compile_merge(&self, merge: &Merge) -> Result<Compiled> {
        let mut ts = TokenStream::new();
        let mut params = Params::new();

        ts.push(Token::Merge).space().push(Token::Into).space();
        ts.push(qualified(&merge.target));
        ts.newline().space().push(Token::Using).space();
        self.merge_source_tokens(&merge.source, &mut ts, &mut params)?;
        ts.newline().space().push(Token::On).space();
        self.expr_tokens(&merge.on, &mut ts, &mut params)?;
        ts.newline();

        for (i, clause) in merge.clauses.iter().enumerate() {
            if i > 0 {
                ts.newline().space();
            }
            self.when_clause_tokens(clause, &mut ts, &mut params)?;
        }

        Ok(self.finish(&ts, params))
    }

    fn finish(&self, ts: &TokenStream, params: Params) -> Compiled {
        Compiled {
            sql: ts.serialize(&self.preparer),
            params,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Append tokens for `expr`, collecting bind parameters into `params`.
    pub fn expr_tokens(&self, expr: &Expr, ts: &mut TokenStream, params: &mut Params) -> Result<()> {
        match expr {
            Expr::Column { table, column } => {
                if let Some(t) = table.as_ref().filter(|_| self.options.include_table) {
                    ts.push(Token::Ident(t.clone())).push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                let text = match lit {
                    Literal::Int(n) => Some(n.to_string()),
                    Literal::Float(f) => render_plain_literal(&Value::Float(*f))?,
                    Literal::String(s) => render_plain_literal(&Value::String(s.clone()))?,
                    Literal::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
                    Literal::Null => None,
                };
                self.push_literal(text, ts);
            }

            Expr::BindParam { name, value, ty } => {
                self.bind_tokens(name, value, ty.as_ref(), ts, params)?;
            }

            Expr::BinaryOp { left, op, right } => {
                if *op == BinaryOperator::Concat {
                    // No `||` operator in Databend
                    ts.push(Token::FunctionName("concat".into())).lparen();
                    self.expr_tokens(left, ts, params)?;
                    ts.comma().space();
                    self.expr_tokens(right, ts, params)?;
                    ts.rparen();
                } else {
                    let prec = op.precedence();
                    let left_wrap = binds_looser(left, prec, op.is_comparison());
                    let right_wrap = binds_looser(
                        right,
                        prec,
                        op.is_comparison() || op.is_right_sensitive(),
                    );
                    self.operand_tokens(left, left_wrap, ts, params)?;
                    ts.space().push(binary_op_to_token(*op)).space();
                    self.operand_tokens(right, right_wrap, ts, params)?;
                }
            }

            Expr::UnaryOp { op, expr } => {
                match op {
                    UnaryOperator::Not => ts.push(Token::Not).space(),
                    UnaryOperator::Minus => ts.push(Token::Minus),
                };
                let wrap = binds_looser(expr, u8::MAX, false);
                self.operand_tokens(expr, wrap, ts, params)?;
            }

            Expr::Like {
                expr,
                pattern,
                escape,
                negated,
            } => {
                if let Some(c) = escape {
                    warn!(escape = %c, "Databend does not support LIKE ... ESCAPE; escape character dropped");
                }
                self.predicate_operand(expr, ts, params)?;
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::Like).space();
                self.expr_tokens(pattern, ts, params)?;
            }

            Expr::Function {
                func,
                args,
                distinct,
            } => self.function_tokens(func, args, *distinct, ts, params)?,

            Expr::Cast { expr, ty } => {
                if self.supports_cast {
                    ts.push(Token::Cast).lparen();
                    self.expr_tokens(expr, ts, params)?;
                    ts.space()
                        .push(Token::As)
                        .space()
                        .raw(self.types.process(ty))
                        .rparen();
                } else {
                    self.expr_tokens(expr, ts, params)?;
                }
            }

            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                ts.push(Token::Case);
                if let Some(op) = operand {
                    ts.space();
                    self.expr_tokens(op, ts, params)?;
                }
                for (when, then) in when_clauses {
                    ts.space().push(Token::When).space();
                    self.expr_tokens(when, ts, params)?;
                    ts.space().push(Token::Then).space();
                    self.expr_tokens(then, ts, params)?;
                }
                if let Some(else_expr) = else_clause {
                    ts.space().push(Token::Else).space();
                    self.expr_tokens(else_expr, ts, params)?;
                }
                ts.space().push(Token::End);
            }

            Expr::Subquery(query) => {
                ts.lparen();
                self.query_tokens(query, ts, params)?;
                ts.rparen();
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                // "x IN ()" is invalid SQL: empty IN is FALSE, empty NOT IN is TRUE
                if values.is_empty() {
                    ts.push(if *negated { Token::True } else { Token::False });
                } else {
                    self.predicate_operand(expr, ts, params)?;
                    if *negated {
                        ts.space().push(Token::Not);
                    }
                    ts.space().push(Token::In).space().lparen();
                    self.comma_separated(values, ts, params)?;
                    ts.rparen();
                }
            }

            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.predicate_operand(expr, ts, params)?;
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::Between).space();
                self.predicate_operand(low, ts, params)?;
                ts.space().push(Token::And).space();
                self.predicate_operand(high, ts, params)?;
            }

            Expr::IsNull { expr, negated } => {
                self.predicate_operand(expr, ts, params)?;
                ts.space()
                    .push(if *negated { Token::IsNotNull } else { Token::IsNull });
            }

            Expr::Star { table } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone())).push(Token::Dot);
                }
                ts.push(Token::Star);
            }

            Expr::Paren(inner) => {
                ts.lparen();
                self.expr_tokens(inner, ts, params)?;
                ts.rparen();
            }

            Expr::Raw(sql) => {
                ts.raw(sql.clone());
            }
        }
        Ok(())
    }

    fn operand_tokens(
        &self,
        operand: &Expr,
        wrap: bool,
        ts: &mut TokenStream,
        params: &mut Params,
    ) -> Result<()> {
        if wrap {
            ts.lparen();
            self.expr_tokens(operand, ts, params)?;
            ts.rparen();
        } else {
            self.expr_tokens(operand, ts, params)?;
        }
        Ok(())
    }

    /// Operand of LIKE, IN, BETWEEN or IS NULL: logical and comparison
    /// operators inside it are grouped.
    fn predicate_operand(&self, operand: &Expr, ts: &mut TokenStream, params: &mut Params) -> Result<()> {
        let wrap = binds_looser(operand, BinaryOperator::Eq.precedence(), true);
        self.operand_tokens(operand, wrap, ts, params)
    }

    fn function_tokens(
        &self,
        func: &Func,
        args: &[Expr],
        distinct: bool,
        ts: &mut TokenStream,
        params: &mut Params,
    ) -> Result<()> {
        let name = match func {
            Func::Random => {
                ts.raw("rand()");
                return Ok(());
            }
            Func::Now => {
                ts.raw("now()");
                return Ok(());
            }
            Func::CurrentDate => {
                ts.raw("today()");
                return Ok(());
            }
            Func::Count => "count",
            Func::Substring => "substring",
            Func::Named(name) => name.as_str(),
        };

        ts.push(Token::FunctionName(name.into())).lparen();
        if distinct {
            ts.push(Token::Distinct).space();
        }
        if *func == Func::Count && args.is_empty() {
            ts.push(Token::Star);
        } else {
            self.comma_separated(args, ts, params)?;
        }
        ts.rparen();
        Ok(())
    }

    fn bind_tokens(
        &self,
        name: &str,
        value: &Value,
        ty: Option<&SqlType>,
        ts: &mut TokenStream,
        params: &mut Params,
    ) -> Result<()> {
        let ty = ty.cloned().or_else(|| SqlType::infer(value));
        let wrapper = ty.as_ref().map(DatabendType::adapt);

        if self.options.literal_binds {
            let text = match &wrapper {
                Some(w) => w.render_literal(value)?,
                None => render_plain_literal(value)?,
            };
            self.push_literal(text, ts);
            return Ok(());
        }

        match params.get(name) {
            Some(bound) if bound != value => {
                return Err(DialectError::InvalidStatement(format!(
                    "bind parameter '{}' is bound to conflicting values {:?} and {:?}",
                    name, bound, value
                )));
            }
            Some(_) => {}
            None => params.insert(name, value.clone()),
        }
        let placeholder = self.param_style.placeholder(name);
        match (&wrapper, &ty) {
            (Some(w), Some(ty)) if w.render_bind_cast() => {
                ts.push(Token::Cast)
                    .lparen()
                    .raw(placeholder)
                    .space()
                    .push(Token::As)
                    .space()
                    .raw(self.types.process(ty))
                    .rparen();
            }
            _ => {
                ts.raw(placeholder);
            }
        }
        Ok(())
    }

    /// Push rendered literal text; absent values render as NULL.
    fn push_literal(&self, text: Option<String>, ts: &mut TokenStream) {
        match text {
            Some(text) if self.param_style == ParamStyle::Pyformat => {
                ts.raw(text.replace('%', "%%"));
            }
            Some(text) => {
                ts.raw(text);
            }
            None => {
                ts.push(Token::Null);
            }
        }
    }

    fn comma_separated(&self, exprs: &[Expr], ts: &mut TokenStream, params: &mut Params) -> Result<()> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            self.expr_tokens(expr, ts, params)?;
        }
        Ok(())
    }

    // =========================================================================
    // SELECT
    // =========================================================================

    /// Append tokens for a SELECT statement.
    pub fn query_tokens(&self, query: &Query, ts: &mut TokenStream, params: &mut Params) -> Result<()> {
        ts.push(Token::Select);
        match &query.distinct {
            Distinct::None => {}
            Distinct::All => {
                ts.space().push(Token::Distinct);
            }
            Distinct::On(_) => {
                warn!("Databend does not support DISTINCT ON; rendering plain DISTINCT");
                ts.space().push(Token::Distinct);
            }
        }

        if query.select.is_empty() {
            ts.newline().indent(1).push(Token::Star);
        }
        for (i, item) in query.select.iter().enumerate() {
            if i == 0 {
                ts.newline().indent(1);
            } else {
                ts.comma().newline().indent(1);
            }
            self.select_item_tokens(item, ts, params)?;
        }

        if let Some(from) = &query.from {
            ts.newline().push(Token::From).space();
            table_ref_tokens(from, ts);
        }

        for join in &query.joins {
            ts.newline();
            self.join_tokens(join, ts, params)?;
        }

        if let Some(where_clause) = &query.where_clause {
            ts.newline().push(Token::Where).space();
            self.expr_tokens(where_clause, ts, params)?;
        }

        if !query.group_by.is_empty() {
            ts.newline().push(Token::GroupBy).space();
            self.comma_separated(&query.group_by, ts, params)?;
        }

        if let Some(having) = &query.having {
            ts.newline().push(Token::Having).space();
            self.expr_tokens(having, ts, params)?;
        }

        if !query.order_by.is_empty() {
            ts.newline().push(Token::OrderBy).space();
            for (i, order) in query.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                self.order_by_tokens(order, ts, params)?;
            }
        }

        if let Some(lo) = &query.limit_offset {
            limit_offset_tokens(lo, ts);
        }

        if query.for_update {
            warn!("Databend does not support FOR UPDATE; clause dropped");
        }

        Ok(())
    }

    fn select_item_tokens(
        &self,
        item: &SelectExpr,
        ts: &mut TokenStream,
        params: &mut Params,
    ) -> Result<()> {
        self.expr_tokens(&item.expr, ts, params)?;
        if let Some(alias) = &item.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        Ok(())
    }

    fn join_tokens(&self, join: &Join, ts: &mut TokenStream, params: &mut Params) -> Result<()> {
        match join.join_type {
            JoinType::Inner => ts.push(Token::Inner),
            JoinType::Left => ts.push(Token::Left),
            JoinType::Right => ts.push(Token::Right),
            JoinType::Full => ts.push(Token::Full).space().push(Token::Outer),
            JoinType::Cross => ts.push(Token::Cross),
        };
        ts.space().push(Token::Join).space();
        table_ref_tokens(&join.table, ts);

        if let Some(on) = &join.on {
            ts.space().push(Token::On).space();
            self.expr_tokens(on, ts, params)?;
        }
        Ok(())
    }

    fn order_by_tokens(
        &self,
        order: &OrderByExpr,
        ts: &mut TokenStream,
        params: &mut Params,
    ) -> Result<()> {
        self.expr_tokens(&order.expr, ts, params)?;
        match order.dir {
            Some(SortDir::Asc) => {
                ts.space().push(Token::Asc);
            }
            Some(SortDir::Desc) => {
                ts.space().push(Token::Desc);
            }
            None => {}
        }
        match order.nulls {
            Some(NullsOrder::First) => {
                ts.space().push(Token::NullsFirst);
            }
            Some(NullsOrder::Last) => {
                ts.space().push(Token::NullsLast);
            }
            None => {}
        }
        Ok(())
    }

    // =========================================================================
    // MERGE
    // =========================================================================

    fn merge_source_tokens(
        &self,
        source: &MergeSource,
        ts: &mut TokenStream,
        params: &mut Params,
    ) -> Result<()> {
        let (query, alias) = match source {
            MergeSource::Table(table) => {
                let mut from = table.clone();
                from.alias = None;
                (Query::new().select_star().from(from), table.table.clone())
            }
            MergeSource::Select(query) => {
                let alias = query.first_from_name().ok_or_else(|| {
                    DialectError::InvalidStatement(
                        "MERGE source SELECT has no FROM clause to alias it by".into(),
                    )
                })?;
                (query.as_ref().clone(), alias.to_string())
            }
            MergeSource::Subquery { query, alias } => (query.as_ref().clone(), alias.clone()),
        };

        ts.lparen();
        self.query_tokens(&query, ts, params)?;
        ts.rparen()
            .space()
            .push(Token::As)
            .space()
            .push(Token::Ident(alias));
        Ok(())
    }

    fn when_clause_tokens(
        &self,
        clause: &WhenClause,
        ts: &mut TokenStream,
        params: &mut Params,
    ) -> Result<()> {
        ts.push(Token::When).space();
        if matches!(clause, WhenClause::NotMatchedInsert { .. }) {
            ts.push(Token::Not).space();
        }
        ts.push(Token::Matched);
        if let Some(predicate) = clause.predicate() {
            ts.space().push(Token::And).space();
            self.expr_tokens(predicate, ts, params)?;
        }
        ts.space().push(Token::Then);

        match clause {
            WhenClause::MatchedDelete { .. } => {
                ts.space().push(Token::Delete);
            }
            WhenClause::MatchedUpdate { set, .. } => {
                ts.newline().tab().push(Token::Update);
                if set.is_empty() {
                    ts.space().push(Token::Star);
                    return Ok(());
                }
                ts.space().push(Token::Set).space();
                for (i, (column, value)) in
                    set.ordered(self.options.deterministic).into_iter().enumerate()
                {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.push(Token::QuotedIdent(column.to_string()))
                        .space()
                        .push(Token::Eq)
                        .space();
                    self.expr_tokens(value, ts, params)?;
                }
            }
            WhenClause::NotMatchedInsert { set, .. } => {
                ts.newline().tab().push(Token::Insert);
                if set.is_empty() {
                    ts.space().push(Token::Star);
                    return Ok(());
                }
                let pairs = set.ordered(self.options.deterministic);
                ts.space().lparen();
                for (i, (column, _)) in pairs.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.push(Token::Ident(column.to_string()));
                }
                ts.rparen().space().push(Token::Values).space().lparen();
                for (i, (_, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    self.expr_tokens(value, ts, params)?;
                }
                ts.rparen();
            }
        }
        Ok(())
    }
}

fn qualified(table: &TableRef) -> Token {
    Token::QualifiedIdent {
        schema: table.schema.clone(),
        name: table.table.clone(),
    }
}

fn table_ref_tokens(table: &TableRef, ts: &mut TokenStream) {
    ts.push(qualified(table));
    if let Some(alias) = &table.alias {
        ts.space()
            .push(Token::As)
            .space()
            .push(Token::Ident(alias.clone()));
    }
}

/// `\nLIMIT n[ OFFSET m]`, or `\nOFFSET m` when only an offset is set.
fn limit_offset_tokens(lo: &LimitOffset, ts: &mut TokenStream) {
    match (lo.limit, lo.offset) {
        (Some(limit), offset) => {
            ts.newline()
                .push(Token::Limit)
                .space()
                .push(Token::LitUInt(limit));
            if let Some(offset) = offset {
                ts.space()
                    .push(Token::Offset)
                    .space()
                    .push(Token::LitUInt(offset));
            }
        }
        (None, Some(offset)) => {
            ts.newline()
                .push(Token::Offset)
                .space()
                .push(Token::LitUInt(offset));
        }
        (None, None) => {}
    }
}

/// Whether `operand` is a binary operation binding looser than `than`
/// (or equally loose, when `inclusive`).
fn binds_looser(operand: &Expr, than: u8, inclusive: bool) -> bool {
    match operand {
        Expr::BinaryOp { op, .. } if *op != BinaryOperator::Concat => {
            let prec = op.precedence();
            prec < than || (inclusive && prec == than)
        }
        _ => false,
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Mod => Token::Mod,
        // Rendered as concat(l, r) before reaching here
        BinaryOperator::Concat => Token::Raw("||".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dml::Assignments;
    use crate::sql::expr::*;
    use crate::sql::test_utils::validate_sql;
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    fn sql(expr: Expr) -> String {
        StatementCompiler::new().compile_expr(&expr).unwrap().sql
    }

    fn sql_literal(expr: Expr) -> String {
        StatementCompiler::new()
            .with_options(CompileOptions::default().literal_binds(true))
            .compile_expr(&expr)
            .unwrap()
            .sql
    }

    #[test]
    fn test_count_forms() {
        assert_eq!(sql(count(col("id"))), "count(id)");
        assert_eq!(sql(count_star()), "count(*)");
        assert_eq!(sql(count_distinct(col("id"))), "count(DISTINCT id)");
    }

    #[test]
    fn test_databend_function_names() {
        assert_eq!(sql(random()), "rand()");
        assert_eq!(sql(now()), "now()");
        assert_eq!(sql(current_date()), "today()");
    }

    #[test]
    fn test_substring() {
        assert_eq!(sql(substring(col("s"), 2, None)), "substring(s, 2)");
        assert_eq!(
            sql(substring(col("s"), 2, Some(lit_int(3)))),
            "substring(s, 2, 3)"
        );
    }

    #[test]
    fn test_concat_operator() {
        assert_eq!(sql(col("a").concat(col("b"))), "concat(a, b)");
    }

    #[test]
    fn test_like_drops_escape() {
        let c = StatementCompiler::new().with_param_style(ParamStyle::Named);
        let like = col("name").like_escape("a\\_b%", '\\');
        assert_eq!(c.compile_expr(&like).unwrap().sql, "name LIKE 'a\\\\_b%'");
        let not_like = col("name").not_like(lit_str("x%"));
        assert_eq!(c.compile_expr(&not_like).unwrap().sql, "name NOT LIKE 'x%'");
    }

    #[test]
    fn test_pyformat_doubles_percent_in_literals() {
        assert_eq!(sql(col("name").like("x%")), "name LIKE 'x%%'");
    }

    #[test]
    fn test_cast_toggle() {
        let e = cast(col("x"), SqlType::Integer);
        assert_eq!(sql(e.clone()), "CAST(x AS INTEGER)");
        let c = StatementCompiler::new().with_supports_cast(false);
        assert_eq!(c.compile_expr(&e).unwrap().sql, "x");
    }

    #[test]
    fn test_bind_placeholders_and_params() {
        let compiled = StatementCompiler::new()
            .compile_expr(&col("id").eq(bind("id_1", 5i64)))
            .unwrap();
        assert_eq!(compiled.sql, "id = %(id_1)s");
        assert_eq!(compiled.params.get("id_1"), Some(&Value::Int(5)));

        let named = StatementCompiler::new()
            .with_param_style(ParamStyle::Named)
            .compile_expr(&col("id").eq(bind("id_1", 5i64)))
            .unwrap();
        assert_eq!(named.sql, "id = :id_1");
    }

    #[test]
    fn test_interval_bind_is_cast() {
        let e = col("gap").gt(typed_bind("gap_1", "1 day", SqlType::Interval));
        assert_eq!(sql(e), "gap > CAST(%(gap_1)s AS INTERVAL)");
    }

    #[test]
    fn test_literal_binds_use_wrappers() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(
            sql_literal(col("ts").eq(bind("ts_1", dt))),
            "ts = '2024-05-06 07:08:09.000000'"
        );
        assert_eq!(
            sql_literal(col("t").eq(bind("t_1", dt.time()))),
            "t = '1000-01-01T07:08:09.000000'"
        );
        assert_eq!(
            sql_literal(col("name").eq(bind("n", "O'Hara"))),
            "name = 'O''Hara'"
        );
        assert_eq!(sql_literal(col("x").eq(bind("x", Value::Null))), "x = NULL");
    }

    #[test]
    fn test_include_table_switch() {
        let e = table_col("orders", "id");
        assert_eq!(sql(e.clone()), "orders.id");
        let c = StatementCompiler::new()
            .with_options(CompileOptions::default().include_table(false));
        assert_eq!(c.compile_expr(&e).unwrap().sql, "id");
    }

    #[test]
    fn test_reserved_identifiers_quoted() {
        assert_eq!(sql(col("user").eq(col("Name"))), "\"user\" = \"Name\"");
    }

    #[test]
    fn test_empty_in_list() {
        assert_eq!(sql(col("a").in_list(vec![])), "false");
        assert_eq!(sql(col("a").not_in_list(vec![])), "true");
    }

    #[test]
    fn test_looser_child_is_grouped() {
        let e = col("a").eq(1).or(col("b").eq(2)).and(col("c").eq(3));
        assert_eq!(sql(e), "(a = 1 OR b = 2) AND c = 3");

        let e = col("a").add(col("b")).mul(col("c"));
        assert_eq!(sql(e), "(a + b) * c");

        // Tighter children stay bare
        let e = col("a").eq(1).and(col("b").eq(2)).or(col("c").eq(3));
        assert_eq!(sql(e), "a = 1 AND b = 2 OR c = 3");
        assert_eq!(sql(col("a").add(col("b").mul(col("c")))), "a + b * c");
    }

    #[test]
    fn test_right_operand_grouped_for_non_associative_ops() {
        assert_eq!(sql(col("a").sub(col("b").sub(col("c")))), "a - (b - c)");
        assert_eq!(sql(col("a").div(col("b").mul(col("c")))), "a / (b * c)");
        assert_eq!(
            sql(col("a").binary(BinaryOperator::Mod, col("b").div(col("c")))),
            "a % (b / c)"
        );
        // Left-leaning chains read the same without parentheses
        assert_eq!(sql(col("a").sub(col("b")).sub(col("c"))), "a - b - c");
        assert_eq!(sql(col("a").add(col("b").add(col("c")))), "a + b + c");
    }

    #[test]
    fn test_comparisons_never_chain() {
        assert_eq!(sql(col("a").eq(col("b")).eq(true)), "(a = b) = true");
    }

    #[test]
    fn test_unary_operand_grouped() {
        assert_eq!(
            sql(col("a").eq(1).and(col("b").eq(2)).not()),
            "NOT (a = 1 AND b = 2)"
        );
        let neg = Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(col("a").add(col("b"))),
        };
        assert_eq!(sql(neg), "-(a + b)");
        assert_eq!(sql(col("a").is_null().not()), "NOT a IS NULL");
    }

    #[test]
    fn test_predicate_operands_grouped() {
        assert_eq!(
            sql(col("a").or(col("b")).is_null()),
            "(a OR b) IS NULL"
        );
        assert_eq!(
            sql(col("a").add(1).between(0, col("b").sub(1))),
            "a + 1 BETWEEN 0 AND b - 1"
        );
    }

    #[test]
    fn test_conflicting_bind_values_rejected() {
        let e = col("a").eq(bind("x", 1i64)).and(col("b").eq(bind("x", 2i64)));
        let err = StatementCompiler::new().compile_expr(&e).unwrap_err();
        assert!(matches!(err, DialectError::InvalidStatement(ref m) if m.contains("'x'")));

        // Reusing a name for the same value is one parameter
        let e = col("a").eq(bind("x", 1i64)).or(col("b").eq(bind("x", 1i64)));
        let compiled = StatementCompiler::new().compile_expr(&e).unwrap();
        assert_eq!(compiled.sql, "a = %(x)s OR b = %(x)s");
        assert_eq!(compiled.params.len(), 1);
    }

    #[test]
    fn test_limit_beyond_i64() {
        let q = Query::new()
            .from(TableRef::new("orders"))
            .limit(u64::MAX)
            .offset(u64::MAX);
        let sql = StatementCompiler::new().compile_query(&q).unwrap().sql;
        assert!(
            sql.ends_with("LIMIT 18446744073709551615 OFFSET 18446744073709551615"),
            "{}",
            sql
        );
    }

    #[test]
    fn test_select_limit_offset() {
        let q = Query::new()
            .select(vec![col("id"), col("name")])
            .from(TableRef::new("orders"))
            .filter(col("id").gt(10))
            .order_by(vec![OrderByExpr::desc(col("id"))])
            .limit(10)
            .offset(20);
        let sql = StatementCompiler::new().compile_query(&q).unwrap().sql;
        assert_snapshot!(sql, @r"
        SELECT
          id,
          name
        FROM orders
        WHERE id > 10
        ORDER BY id DESC
        LIMIT 10 OFFSET 20
        ");
        validate_sql(&sql).unwrap();
    }

    #[test]
    fn test_offset_only_keeps_newline() {
        let q = Query::new().from(TableRef::new("orders")).offset(5);
        let sql = StatementCompiler::new().compile_query(&q).unwrap().sql;
        assert!(sql.ends_with("FROM orders\nOFFSET 5"), "{}", sql);
    }

    #[test]
    fn test_distinct_on_and_for_update_degrade() {
        let q = Query::new()
            .select(vec![col("a")])
            .distinct_on(vec![col("a")])
            .from(TableRef::new("orders"))
            .for_update();
        let sql = StatementCompiler::new().compile_query(&q).unwrap().sql;
        assert_eq!(sql, "SELECT DISTINCT\n  a\nFROM orders");
    }

    #[test]
    fn test_merge_table_source() {
        let merge = Merge::into("orders")
            .using_table("staging")
            .on(table_col("orders", "id").eq(table_col("staging", "id")))
            .when_matched_update(
                Assignments::new()
                    .set("qty", table_col("staging", "qty"))
                    .set("price", table_col("staging", "price")),
            )
            .when_not_matched_insert_all();
        let sql = StatementCompiler::new().compile_merge(&merge).unwrap().sql;
        assert_eq!(
            sql,
            "MERGE INTO orders\n USING (SELECT\n  *\nFROM staging) AS staging\n \
             ON orders.id = staging.id\n\
             WHEN MATCHED THEN\n\tUPDATE SET \"qty\" = staging.qty, \"price\" = staging.price\n \
             WHEN NOT MATCHED THEN\n\tINSERT *"
        );
    }

    #[test]
    fn test_merge_deterministic_insert() {
        let merge = Merge::into("orders")
            .using_subquery(Query::new().from(TableRef::new("staging")), "s")
            .on(table_col("orders", "id").eq(table_col("s", "id")))
            .when_not_matched_and_insert(
                table_col("s", "qty").gt(0),
                Assignments::new()
                    .set("qty", table_col("s", "qty"))
                    .set("id", table_col("s", "id")),
            );
        let c = StatementCompiler::new()
            .with_options(CompileOptions::default().deterministic(true));
        let sql = c.compile_merge(&merge).unwrap().sql;
        assert!(
            sql.ends_with(
                "WHEN NOT MATCHED AND s.qty > 0 THEN\n\tINSERT (id, qty) VALUES (s.id, s.qty)"
            ),
            "{}",
            sql
        );
    }

    #[test]
    fn test_merge_select_without_from_is_rejected() {
        let merge = Merge::into("orders").using_select(Query::new().select(vec![lit_int(1)]));
        let err = StatementCompiler::new().compile_merge(&merge).unwrap_err();
        assert!(matches!(err, DialectError::InvalidStatement(_)));
    }
}
