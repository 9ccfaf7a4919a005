//! End-to-end resolution tests.

mod common;

use chrono::NaiveDate;
use proptest::prelude::*;

use common::*;
use sift_sql::{
    FetchType, FieldParam, Operator, OrderParam, PageParam, SearchError, SearchParam, SqlResolver,
    SqlValue,
};

fn ts(day: u32, h: u32, m: u32, s: u32) -> SqlValue {
    SqlValue::Timestamp(
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap(),
    )
}

#[test]
fn test_simple_list_scenario() {
    let param = SearchParam::new(FetchType::list_only())
        .with_field_param(FieldParam::new(
            "name",
            Operator::Include,
            vec![SqlValue::text("jo")],
        ))
        .with_page(PageParam::new(0, 10));

    let sql = SqlResolver::default()
        .resolve(&simple_users(), &param)
        .unwrap();

    assert_eq!(
        sql.list_sql.as_deref(),
        Some("select t.id id, t.name name from t where t.name like ? limit ?, ?")
    );
    assert_eq!(
        sql.list_params,
        vec![SqlValue::text("%jo%"), SqlValue::Integer(0), SqlValue::Integer(10)]
    );
    assert_eq!(sql.list_aliases, vec!["id", "name"]);
    assert!(sql.cluster_sql.is_none());
    assert!(sql.cluster_params.is_empty());
}

#[test]
fn test_join_filters_sums_and_order() {
    let param = SearchParam::new(FetchType::all().with_summary(["salary"]))
        .with_embed_param("tenant", 42)
        .with_embed_param("shard", "2024")
        .with_field_param(
            FieldParam::new("name", Operator::StartWith, vec![SqlValue::text("jo")])
                .ignore_case(true),
        )
        .with_field_param(FieldParam::new(
            "age",
            Operator::Between,
            vec![SqlValue::Integer(18), SqlValue::text("")],
        ))
        .with_field_param(FieldParam::new(
            "created",
            Operator::Between,
            vec![SqlValue::text("2024-01-01"), SqlValue::text("2024-01-31")],
        ))
        .with_field_param(FieldParam::new(
            "dept",
            Operator::MultiValue,
            vec![SqlValue::text("HR"), SqlValue::Null],
        ))
        .with_order(OrderParam::parse("-age"))
        .with_page(PageParam::new(20, 10));

    let sql = SqlResolver::default()
        .resolve(&users_with_departments(), &param)
        .unwrap();

    let from_where = " from user_2024 u, department d \
        where (u.dept_id = d.id and d.tenant_id = ?) \
        and upper(u.name) like ? \
        and u.age >= ? \
        and u.created_at between ? and ? \
        and (d.name = ? or d.name is null)";
    let filter_params = vec![
        SqlValue::Integer(42),
        SqlValue::text("JO%"),
        SqlValue::Integer(18),
        ts(1, 0, 0, 0),
        ts(31, 23, 59, 59),
        SqlValue::text("HR"),
    ];

    assert_eq!(
        sql.list_sql.as_deref(),
        Some(
            format!(
                "select u.id id, u.name name, u.age age, d.name dept_name, u.created_at created{} order by age desc limit ?, ?",
                from_where
            )
            .as_str()
        )
    );
    let mut list_params = filter_params.clone();
    list_params.extend([SqlValue::Integer(20), SqlValue::Integer(10)]);
    assert_eq!(sql.list_params, list_params);
    assert_eq!(sql.list_aliases, vec!["id", "name", "age", "dept_name", "created"]);

    assert_eq!(
        sql.cluster_sql.as_deref(),
        Some(format!("select count(*) col_count, sum(u.salary) col_salary{}", from_where).as_str())
    );
    assert_eq!(sql.cluster_params, filter_params);
    assert_eq!(sql.count_alias.as_deref(), Some("col_count"));
    assert_eq!(sql.summary_aliases, vec!["col_salary"]);

    assert_binds_match(sql.list_sql.as_deref().unwrap(), &sql.list_params);
    assert_binds_match(sql.cluster_sql.as_deref().unwrap(), &sql.cluster_params);
}

#[test]
fn test_distinct_total_and_sums_wrap_the_list_query() {
    let param = SearchParam::new(FetchType::all().with_summary(["price", "score"]))
        .with_embed_param("weight", 2)
        .with_field_param(FieldParam::new(
            "price",
            Operator::GreaterThan,
            vec![SqlValue::Integer(10)],
        ));

    let sql = SqlResolver::default()
        .resolve(&distinct_scored(), &param)
        .unwrap();

    let original =
        "select distinct i.id id, i.rating * ? score, i.price price from item i where i.price > ?";
    assert_eq!(sql.list_sql.as_deref(), Some(original));
    assert_eq!(
        sql.cluster_sql.as_deref(),
        Some(
            format!(
                "select count(*) col_count, sum(i.price) col_price, sum(i.rating) col_score from ({}) tbl_",
                original
            )
            .as_str()
        )
    );
    assert_eq!(sql.list_params, vec![SqlValue::Integer(2), SqlValue::Integer(10)]);
    assert_eq!(sql.cluster_params, sql.list_params);
    assert_eq!(sql.summary_aliases, vec!["col_price", "col_score"]);
}

#[test]
fn test_generated_aliases_avoid_field_aliases() {
    let param = SearchParam::new(FetchType::total_only().with_summary(["amount"]));
    let sql = SqlResolver::default()
        .resolve(&alias_clash(), &param)
        .unwrap();

    assert_eq!(
        sql.cluster_sql.as_deref(),
        Some(
            "select count(*) col_count0, sum(t.amount) col_amount \
             from (select distinct t.cnt col_count, t.tbl tbl_, t.amount amount from t) tbl_0"
        )
    );
    assert_eq!(sql.count_alias.as_deref(), Some("col_count0"));
    assert_unique(&["col_count", "tbl_", "amount", "col_count0", "col_amount", "tbl_0"]);
}

#[test]
fn test_grouped_cluster_counts_groups() {
    let param = SearchParam::new(FetchType::all().with_summary(["total"]))
        .with_embed_param("region", "EU");

    let sql = SqlResolver::default()
        .resolve(&grouped_orders(), &param)
        .unwrap();

    let from_where = " from orders o group by o.customer_id, coalesce(o.region, ?)";
    assert_eq!(
        sql.list_sql.as_deref(),
        Some(format!("select o.customer_id customer, sum(o.amount) total{}", from_where).as_str())
    );
    assert_eq!(
        sql.cluster_sql.as_deref(),
        Some(
            format!(
                "select count(*) col_count, sum(col_total) col_total from (select sum(o.amount) col_total{}) tbl_",
                from_where
            )
            .as_str()
        )
    );
    assert_eq!(sql.list_params, vec![SqlValue::text("EU")]);
    assert_eq!(sql.cluster_params, vec![SqlValue::text("EU")]);
}

#[test]
fn test_unmapped_summary_aborts_resolution() {
    let param = SearchParam::new(FetchType::all().with_summary(["nickname"]));
    let err = SqlResolver::default()
        .resolve(&simple_users(), &param)
        .unwrap_err();
    assert_eq!(
        err,
        SearchError::UnmappedSummaryField {
            field: "nickname".to_string()
        }
    );
    assert!(err.is_configuration());
}

#[test]
fn test_fetch_directives_select_statements() {
    let resolver = SqlResolver::default();

    let total = resolver
        .resolve(&simple_users(), &SearchParam::new(FetchType::total_only()))
        .unwrap();
    assert!(total.list_sql.is_none());
    assert!(total.should_query_cluster);
    assert!(!total.should_query_list);
    assert!(total.should_query_total());

    let list = resolver
        .resolve(&simple_users(), &SearchParam::new(FetchType::list_only()))
        .unwrap();
    assert!(list.cluster_sql.is_none());
    assert!(list.count_alias.is_none());
}

#[test]
fn test_concurrent_resolutions_share_collaborators() {
    let resolver = SqlResolver::default();
    let metadata = users_with_departments();
    let param = SearchParam::new(FetchType::all())
        .with_embed_param("tenant", 1)
        .with_embed_param("shard", "a")
        .with_page(PageParam::new(0, 5));
    let expected = resolver.resolve(&metadata, &param).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolver.resolve(&metadata, &param).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

proptest! {
    #[test]
    fn resolution_is_deterministic(
        op_index in 0usize..13,
        values in prop::collection::vec("[a-z ]{0,6}", 0..4),
        ignore_case in any::<bool>(),
        distinct in any::<bool>(),
        offset in 0u64..1000,
        max in 1u64..100,
    ) {
        let metadata = if distinct { distinct_scored() } else { simple_users() };
        let field = if distinct { "price" } else { "name" };
        let operator = Operator::ALL[op_index];
        let values: Vec<SqlValue> = values.into_iter().map(SqlValue::from).collect();
        let param = SearchParam::new(FetchType::all())
            .with_embed_param("weight", 1)
            .with_field_param(FieldParam::new(field, operator, values).ignore_case(ignore_case))
            .with_page(PageParam::new(offset, max));

        let resolver = SqlResolver::default();
        let first = resolver.resolve(&metadata, &param).unwrap();
        let second = resolver.resolve(&metadata, &param).unwrap();
        prop_assert_eq!(&first, &second);

        let list_sql = first.list_sql.as_deref().unwrap();
        prop_assert_eq!(list_sql.matches('?').count(), first.list_params.len());
        let cluster_sql = first.cluster_sql.as_deref().unwrap();
        prop_assert_eq!(cluster_sql.matches('?').count(), first.cluster_params.len());
    }
}
