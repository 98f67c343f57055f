//! Integration tests for SQL compilation through the public API.

use chrono::NaiveDate;
use databend_dialect::config::Settings;
use databend_dialect::prelude::*;
use databend_dialect::sql::ddl::{DdlStatement, DropSchema, TableConstraint};
use databend_dialect::sql::dml::WhenClause;
use insta::assert_snapshot;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

fn parses(sql: &str) {
    Parser::parse_sql(&GenericDialect {}, sql)
        .unwrap_or_else(|e| panic!("generated SQL does not parse: {}\n{}", e, sql));
}

// ============================================================================
// SELECT
// ============================================================================

#[test]
fn test_aggregate_report_query() {
    let query = Query::new()
        .select(vec![
            SelectExpr::new(table_col("orders", "customer_id")),
            count_star().alias("order_count"),
        ])
        .from(TableRef::new("orders"))
        .left_join(
            TableRef::new("customers"),
            table_col("orders", "customer_id").eq(table_col("customers", "id")),
        )
        .filter(table_col("orders", "amount").gt(100))
        .group_by(vec![table_col("orders", "customer_id")])
        .having(count_star().gt(5))
        .order_by(vec![OrderByExpr::desc(col("order_count")).nulls_last()])
        .limit(10);

    let sql = DatabendDialect::new()
        .statement_compiler()
        .compile_query(&query)
        .unwrap()
        .sql;

    assert_snapshot!(sql, @r"
    SELECT
      orders.customer_id,
      count(*) AS order_count
    FROM orders
    LEFT JOIN customers ON orders.customer_id = customers.id
    WHERE orders.amount > 100
    GROUP BY orders.customer_id
    HAVING count(*) > 5
    ORDER BY order_count DESC NULLS LAST
    LIMIT 10
    ");
    parses(&sql);
}

#[test]
fn test_bound_parameters_collected_in_order() {
    let query = Query::new()
        .select(vec![col("id")])
        .from(TableRef::new("events"))
        .filter(col("region").eq(bind("region_1", "emea")))
        .filter(col("amount").between(bind("lo", 10i64), bind("hi", 20i64)));

    let compiled = DatabendDialect::new()
        .statement_compiler()
        .compile_query(&query)
        .unwrap();

    assert!(compiled
        .sql
        .ends_with("WHERE region = %(region_1)s AND amount BETWEEN %(lo)s AND %(hi)s"));
    let names: Vec<&str> = compiled.params.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["region_1", "lo", "hi"]);
}

#[test]
fn test_reserved_and_mixed_case_identifiers() {
    let query = Query::new()
        .select(vec![col("user"), col("Amount")])
        .from(TableRef::new("users").with_schema("Sales"));
    let sql = StatementCompiler::new().compile_query(&query).unwrap().sql;
    assert_eq!(sql, "SELECT\n  \"user\",\n  \"Amount\"\nFROM \"Sales\".\"users\"");
    parses(&sql);
}

#[test]
fn test_literal_binds_render_through_wrappers() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let expr = col("created_at")
        .gte(bind("start", day))
        .and(col("price").lt(typed_bind("cap", 9.5, SqlType::numeric(10, 2))));

    let compiler = StatementCompiler::new()
        .with_options(CompileOptions::default().literal_binds(true));
    let compiled = compiler.compile_expr(&expr).unwrap();

    assert_eq!(
        compiled.sql,
        "created_at >= '2024-01-31' AND price < 9.5"
    );
    assert!(compiled.params.is_empty());
}

// ============================================================================
// MERGE
// ============================================================================

fn upsert() -> Merge {
    Merge::into("dim_customers")
        .using_select(
            Query::new()
                .select(vec![col("id"), col("name"), col("email")])
                .from(TableRef::new("staging_customers"))
                .filter(col("email").is_not_null()),
        )
        .on(table_col("dim_customers", "id").eq(table_col("staging_customers", "id")))
        .when_matched_and_delete(table_col("staging_customers", "deleted").eq(true))
        .when_matched_update(
            Assignments::new()
                .set("name", table_col("staging_customers", "name"))
                .set("email", table_col("staging_customers", "email")),
        )
        .when_not_matched_insert(
            Assignments::new()
                .set("name", table_col("staging_customers", "name"))
                .set("id", table_col("staging_customers", "id"))
                .set("email", table_col("staging_customers", "email")),
        )
}

#[test]
fn test_merge_select_source_aliased_by_from_table() {
    let sql = StatementCompiler::new().compile_merge(&upsert()).unwrap().sql;
    let lines: Vec<&str> = sql.lines().collect();

    assert_eq!(lines[0], "MERGE INTO dim_customers");
    assert_eq!(lines[1], " USING (SELECT");
    assert!(sql.contains("WHERE email IS NOT NULL) AS staging_customers\n ON dim_customers.id = staging_customers.id\n"));
    assert!(sql.contains("WHEN MATCHED AND staging_customers.deleted = true THEN DELETE\n WHEN MATCHED THEN\n\tUPDATE SET \"name\" = staging_customers.name, \"email\" = staging_customers.email\n"));
    assert!(sql.ends_with(
        " WHEN NOT MATCHED THEN\n\tINSERT (name, id, email) VALUES (staging_customers.name, staging_customers.id, staging_customers.email)"
    ));
}

#[test]
fn test_merge_deterministic_from_settings() {
    let settings = Settings::from_toml("[dialect]\ndeterministic_merge = true\n").unwrap();
    let dialect = DatabendDialect::new().with_settings(&settings.dialect);
    let sql = dialect.statement_compiler().compile_merge(&upsert()).unwrap().sql;

    assert!(sql.contains("UPDATE SET \"email\" = staging_customers.email, \"name\" = staging_customers.name"));
    assert!(sql.ends_with(
        "INSERT (email, id, name) VALUES (staging_customers.email, staging_customers.id, staging_customers.name)"
    ));
}

#[test]
fn test_merge_wildcard_clauses() {
    let merge = Merge::into("orders")
        .target_schema("analytics")
        .using_table_with_schema("staging", "orders")
        .on(table_col("orders", "id").eq(table_col("orders", "id")))
        .when_matched_update_all()
        .when(WhenClause::NotMatchedInsert {
            predicate: Some(col("amount").gt(0)),
            set: Assignments::new(),
        });
    let sql = StatementCompiler::new().compile_merge(&merge).unwrap().sql;

    assert!(sql.starts_with("MERGE INTO analytics.orders\n USING (SELECT\n  *\nFROM staging.orders) AS orders\n"));
    assert!(sql.ends_with("WHEN MATCHED THEN\n\tUPDATE *\n WHEN NOT MATCHED AND amount > 0 THEN\n\tINSERT *"));
}

// ============================================================================
// DDL
// ============================================================================

#[test]
fn test_create_table_with_all_options() {
    let table = Table::new("events")
        .schema("analytics")
        .column(ColumnDef::new("id", SqlType::BigInt).primary_key())
        .column(ColumnDef::new("ts", SqlType::Timestamp).not_null())
        .column(ColumnDef::new("payload", SqlType::Json))
        .column(
            ColumnDef::new("amount", SqlType::Numeric { precision: None, scale: None })
                .default(lit_int(0)),
        )
        .constraint(TableConstraint::primary_key(["id"]))
        .options(
            TableOptions::new()
                .engine("FUSE")
                .cluster_by(ClusterBy::Keys(vec![
                    ClusterKey::Column("ts".into()),
                    ClusterKey::Expr(func("to_yyyymm", vec![col("ts")])),
                ]))
                .transient(true),
        );

    let sql = DatabendDialect::new().ddl_compiler().create_table(&table).unwrap();
    assert_eq!(
        sql,
        "CREATE TRANSIENT TABLE analytics.events (\n\
         \tid BIGINT NOT NULL, \n\
         \tts TIMESTAMP NOT NULL, \n\
         \tpayload JSON, \n\
         \tamount DECIMAL(38, 10) DEFAULT 0\n\
         ) ENGINE=FUSE \n CLUSTER BY ( ts, to_yyyymm(ts) )"
    );
}

#[test]
fn test_unsupported_ddl_degrades() {
    let ddl = DdlCompiler::new();
    assert_eq!(
        ddl.compile(&DdlStatement::DropSchema(DropSchema::new("analytics").cascade()))
            .unwrap(),
        "DROP SCHEMA analytics"
    );
    let table = Table::new("t1")
        .column(ColumnDef::new("a", SqlType::Integer))
        .constraint(TableConstraint::foreign_key(["a"], "t2", ["id"]));
    assert_eq!(
        ddl.create_table(&table).unwrap(),
        "CREATE TABLE t1 (\n\ta INTEGER\n)"
    );
}
