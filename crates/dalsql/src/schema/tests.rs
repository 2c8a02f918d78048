use super::*;

#[test]
fn aliases_follow_registration_order() {
    let mut schema = Schema::new("test");
    schema.add_table("foo", Vec::<String>::new()).unwrap();
    schema.add_table("foe", ["id"]).unwrap();
    schema.add_table("foo2", ["id"]).unwrap();

    assert_eq!(schema.table("foo").unwrap().alias(), "f");
    assert_eq!(schema.table("foe").unwrap().alias(), "f1");
    assert_eq!(schema.table("foo2").unwrap().alias(), "f2");
}

#[test]
fn alias_counter_restarts_per_registration() {
    let mut schema = Schema::new("test");
    for name in ["bar", "baz", "bat", "car", "bun"] {
        schema.add_table(name, ["id"]).unwrap();
    }
    let aliases: Vec<&str> = schema.tables().map(Table::alias).collect();
    assert_eq!(aliases, ["b", "b1", "b2", "c", "b3"]);
}

#[test]
fn alias_lookup_by_assigned_alias() {
    let mut schema = Schema::new("test");
    schema.add_table("b", ["id"]).unwrap();
    schema.add_table("bb", ["id"]).unwrap();
    schema.add_table("bee", ["id"]).unwrap();
    assert_eq!(schema.table("bee").unwrap().alias(), "b2");
    assert_eq!(schema.table_by_alias("b1").unwrap().name(), "bb");
}

#[test]
fn aliases_are_unique() {
    let mut schema = Schema::new("test");
    let names = ["users", "user_roles", "uploads", "orders", "order_items", "u2"];
    for name in names {
        schema.add_table(name, ["id"]).unwrap();
    }
    let mut aliases: Vec<&str> = schema.tables().map(Table::alias).collect();
    aliases.sort_unstable();
    aliases.dedup();
    assert_eq!(aliases.len(), names.len());
}

#[test]
fn duplicate_table_is_rejected() {
    let mut schema = Schema::new("test");
    schema.add_table("foo", ["id"]).unwrap();
    let err = schema.add_table("foo", ["id"]).unwrap_err();
    assert_eq!(err, DalError::DuplicateTable("foo".into()));
    assert_eq!(schema.tables().count(), 1);
}

#[test]
fn unknown_table_is_rejected() {
    let schema = Schema::new("test");
    assert_eq!(
        schema.table("ghost").unwrap_err(),
        DalError::UnknownTable("ghost".into())
    );
    assert!(schema.update("ghost").is_err());
    assert!(schema.delete("ghost").is_err());
    assert!(schema.insert("ghost").is_err());
    assert!(schema.count("ghost").is_err());
}

#[test]
fn empty_table_name_is_rejected() {
    let mut schema = Schema::new("test");
    assert!(matches!(
        schema.add_table("", ["id"]),
        Err(DalError::Validation(_))
    ));
}

#[test]
fn fields_keep_declaration_order() {
    let mut schema = Schema::new("test");
    schema
        .add_table("foe", ["id", "name", "createdAt", "fooId"])
        .unwrap();
    let names: Vec<&str> = schema.table("foe").unwrap().field_names().collect();
    assert_eq!(names, ["id", "name", "createdAt", "fooId"]);
}

#[test]
fn duplicate_field_is_rejected() {
    let mut schema = Schema::new("test");
    let err = schema.add_table("foo", ["id", "id"]).unwrap_err();
    assert_eq!(
        err,
        DalError::DuplicateField {
            table: "foo".into(),
            field: "id".into()
        }
    );
    // the table was never registered, so its alias is still free
    schema.add_table("foo", ["id"]).unwrap();
    assert_eq!(schema.table("foo").unwrap().alias(), "f");
}

#[test]
fn define_prebuilt_table() {
    let mut table = Table::new("foo");
    table
        .add(Field::new("id").with_type("int").with_default("0"))
        .unwrap()
        .add_field("name")
        .unwrap();
    assert_eq!(
        table.field("missing").unwrap_err(),
        DalError::missing_field("foo", "missing")
    );

    let mut schema = Schema::new("test");
    let table = schema.define(table).unwrap();
    assert_eq!(table.alias(), "f");
    let id = table.field("id").unwrap();
    assert_eq!((id.ty.as_str(), id.default_value.as_str()), ("int", "0"));
}

#[test]
fn new_query_binds_kind_and_table() {
    let mut schema = Schema::new("test");
    schema.add_table("foo", ["id"]).unwrap();
    let q = schema.new_query("foo", QueryKind::Delete).unwrap();
    assert_eq!(q.kind(), QueryKind::Delete);
    assert_eq!(q.table().name(), "foo");
}

#[test]
fn config_deserializes_with_defaults() {
    let config: SchemaConfig = serde_json::from_str("{}").unwrap();
    assert!(!config.allow_unfiltered_mutations);

    let config: SchemaConfig =
        serde_json::from_str(r#"{"allow_unfiltered_mutations": true}"#).unwrap();
    assert!(config.allow_unfiltered_mutations);
}
