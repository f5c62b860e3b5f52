#![cfg(feature = "sqlite")]

use sql_record::{
    DbConfig, Db, JoinKind, ParamType, QueryBuilder, RowValues, SqliteConnection,
};

fn store() -> Result<Db, Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open(&DbConfig::default())?;
    conn.execute_batch(
        "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL);
         CREATE TABLE stock (product_id INTEGER NOT NULL, site TEXT NOT NULL, qty INTEGER NOT NULL);
         INSERT INTO products (id, name, price) VALUES (1, 'lamp', 5.29), (2, 'desk', 120.0), (3, 'chair', 45.5);
         INSERT INTO stock (product_id, site, qty) VALUES
            (1, 'north', 10), (1, 'south', 0), (2, 'north', 2), (3, 'south', 7);",
    )?;
    Ok(Db::new(conn))
}

#[test]
fn select_star_when_no_columns_given() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let qb = QueryBuilder::for_table("products").select(&[]);
    assert_eq!(qb.render()?, "SELECT * FROM products");
    let rows = qb.execute(&db)?;
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.get_column_names().map(|c| c.as_slice().to_vec()),
        Some(vec!["id".to_string(), "name".to_string(), "price".to_string()])
    );
    Ok(())
}

#[test]
fn where_and_or_bind_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let qb = QueryBuilder::new()
        .select(&["name"])
        .from("products")
        .and_where_bind("price > ?", 40)
        .and_where_bind("price < ?", 100.0)
        .or_where_bind("name = ?", "lamp")
        .order_by("id");
    assert_eq!(
        qb.render()?,
        "SELECT name FROM products WHERE price > :p1 AND price < :p2 OR name = :p3 ORDER BY id"
    );
    let types: Vec<ParamType> = qb.params().iter().map(|p| p.ty).collect();
    assert_eq!(types, [ParamType::Int, ParamType::Text, ParamType::Text]);

    let names: Vec<String> = qb
        .fetch(&db)?
        .into_iter()
        .filter_map(|row| row.get("name").and_then(RowValues::as_text).map(str::to_string))
        .collect();
    assert_eq!(names, ["lamp", "chair"]);
    Ok(())
}

#[test]
fn join_markers_bind_their_own_values() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let qb = QueryBuilder::for_table("products")
        .select(&["products.name", "s.qty"])
        .join_bind(
            "stock s",
            "s.product_id = products.id AND s.site = ? AND s.qty > ?",
            [RowValues::from("north"), RowValues::from(1)],
        )
        .order_by("products.id");
    let params = qb.params();
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, [":p1", ":p2"]);

    let rows = qb.execute(&db)?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.results[0].get("qty"), Some(&RowValues::Int(10)));
    assert_eq!(rows.results[1].get("name"), Some(&RowValues::Text("desk".into())));
    Ok(())
}

#[test]
fn where_added_before_join_still_binds_in_text_order() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let qb = QueryBuilder::for_table("products")
        .select(&["products.name"])
        .and_where_bind("products.price < ?", 100)
        .join_bind(
            "stock s",
            "s.product_id = products.id AND s.site = ?",
            ["south"],
        )
        .order_by("products.id");
    let built = qb.build()?;
    assert_eq!(
        built.query,
        "SELECT products.name FROM products INNER JOIN stock s \
         ON s.product_id = products.id AND s.site = :p1 WHERE products.price < :p2 \
         ORDER BY products.id"
    );
    assert_eq!(built.params[0].value, RowValues::Text("south".into()));
    assert_eq!(built.params[1].value, RowValues::Int(100));

    let names: Vec<RowValues> = qb
        .execute(&db)?
        .into_iter()
        .filter_map(|row| row.get("name").cloned())
        .collect();
    assert_eq!(names, [RowValues::from("lamp"), RowValues::from("chair")]);
    Ok(())
}

#[test]
fn line_comment_in_a_predicate_keeps_later_clauses() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let rows = QueryBuilder::for_table("products")
        .and_where("price > 1 -- cheap ones are excluded")
        .and_where_bind("name = ?", "desk")
        .execute(&db)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.results[0].get("id"), Some(&RowValues::Int(2)));

    let rows = QueryBuilder::for_table("products")
        .and_where("price > 1 -- every product")
        .and_where("id = 3")
        .execute(&db)?;
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[test]
fn left_join_keeps_unmatched_rows() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let rows = QueryBuilder::for_table("products")
        .select(&["products.id", "s.qty"])
        .join_as(
            JoinKind::Left,
            "stock s",
            "s.product_id = products.id AND s.site = ?",
            ["south"],
        )
        .order_by("products.id")
        .execute(&db)?;
    assert_eq!(rows.len(), 3);
    assert!(rows.results[1].get("qty").is_some_and(RowValues::is_null));
    Ok(())
}

#[test]
fn join_count_mismatch_never_reaches_the_database() {
    let db = store().unwrap();
    let err = QueryBuilder::for_table("products")
        .join_bind("stock s", "s.product_id = products.id AND s.site = ?", ["a", "b"])
        .execute(&db)
        .unwrap_err();
    assert!(err.is_argument_error());
}

#[test]
fn grouping_and_pagination() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let qb = QueryBuilder::for_table("stock")
        .select(&["site", "SUM(qty) AS total"])
        .group_by("site")
        .having_bind("SUM(qty) > ?", 5)
        .order_by("site");
    let rows = qb.execute(&db)?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.results[0].get("total"), Some(&RowValues::Int(12)));

    let page = QueryBuilder::for_table("products")
        .order_by("id")
        .offset(1)
        .take(1)
        .fetch_one(&db)?
        .expect("second product");
    assert_eq!(page.get("name"), Some(&RowValues::Text("desk".into())));

    let tail = QueryBuilder::for_table("products").order_by("id").offset(2).execute(&db)?;
    assert_eq!(tail.len(), 1);
    Ok(())
}

#[test]
fn markers_inside_literals_are_left_alone() -> Result<(), Box<dyn std::error::Error>> {
    let db = store()?;
    let qb = QueryBuilder::for_table("products")
        .and_where_bind("name <> 'what?' AND id = ?", 3);
    assert_eq!(
        qb.render()?,
        "SELECT * FROM products WHERE name <> 'what?' AND id = :p1"
    );
    let row = qb.fetch_one(&db)?.expect("chair");
    assert_eq!(row.get("name"), Some(&RowValues::Text("chair".into())));
    Ok(())
}

#[test]
fn driver_errors_carry_diagnostics() {
    let db = store().unwrap();
    let err = QueryBuilder::for_table("missing").execute(&db).unwrap_err();
    let info = err.error_info().expect("driver diagnostics");
    assert_eq!(info.sqlstate, "HY000");
    assert!(info.message.contains("missing"));
}
