//! Entity metadata fixtures.

use sift_sql::{FieldMeta, FieldType, Metadata};

/// `{id: t.id, name: t.name}` over table `t`.
pub fn simple_users() -> Metadata {
    Metadata::builder("t")
        .field("id", FieldMeta::select("t.id", FieldType::Long))
        .field("name", FieldMeta::select("t.name", FieldType::Text))
        .build()
        .expect("simple users metadata")
}

/// Users joined to departments, with a bound tenant parameter in the join
/// condition and a literal shard suffix in the table.
pub fn users_with_departments() -> Metadata {
    Metadata::builder("user_:shard: u, department d")
        .field("id", FieldMeta::select("u.id", FieldType::Long))
        .field("name", FieldMeta::select("u.name", FieldType::Text))
        .field("age", FieldMeta::select("u.age", FieldType::Integer))
        .field("dept", FieldMeta::select("d.name", FieldType::Text).with_alias("dept_name"))
        .field("created", FieldMeta::select("u.created_at", FieldType::DateTime))
        .field("salary", FieldMeta::column("u.salary", FieldType::Decimal))
        .join_cond("u.dept_id = d.id and d.tenant_id = :tenant")
        .build()
        .expect("users with departments metadata")
}

/// A distinct query whose select clause embeds a bound parameter.
pub fn distinct_scored() -> Metadata {
    Metadata::builder("item i")
        .field("id", FieldMeta::select("i.id", FieldType::Long))
        .field(
            "score",
            FieldMeta::select("i.rating * :weight", FieldType::Double).with_column("i.rating"),
        )
        .field("price", FieldMeta::select("i.price", FieldType::Decimal))
        .distinct(true)
        .build()
        .expect("distinct scored metadata")
}

/// Orders grouped by customer, with a bound parameter in the group-by clause.
pub fn grouped_orders() -> Metadata {
    Metadata::builder("orders o")
        .field("customer", FieldMeta::select("o.customer_id", FieldType::Long))
        .field(
            "total",
            FieldMeta::select("sum(o.amount)", FieldType::Decimal).with_column("o.amount"),
        )
        .group_by("o.customer_id, coalesce(o.region, :region)")
        .build()
        .expect("grouped orders metadata")
}

/// A table whose field aliases already use the synthetic alias seeds.
pub fn alias_clash() -> Metadata {
    Metadata::builder("t")
        .field("count", FieldMeta::select("t.cnt", FieldType::Long).with_alias("col_count"))
        .field("tbl", FieldMeta::select("t.tbl", FieldType::Text).with_alias("tbl_"))
        .field("amount", FieldMeta::select("t.amount", FieldType::Decimal))
        .distinct(true)
        .build()
        .expect("alias clash metadata")
}
