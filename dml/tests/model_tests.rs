use dml::{Attribute, AttributeArg, AttributeValue, Field, FieldType, Model, PrimaryKey, Schema};

fn id_field(name: &str) -> Field {
    Field::new(name, FieldType::new("Int")).with_attribute(Attribute::new("id"))
}

#[test]
fn composite_id_wins_over_field_level_id() {
    let model = Model::new("UserRole")
        .with_field(id_field("userId"))
        .with_field(Field::new("roleId", FieldType::new("Int")))
        .with_attribute(Attribute::with_args(
            "id",
            vec![AttributeArg::unnamed(AttributeValue::List(vec![
                "userId".into(),
                "roleId".into(),
            ]))],
        ));

    assert_eq!(
        model.primary_key(),
        PrimaryKey::Composite(vec!["userId".into(), "roleId".into()])
    );
}

#[test]
fn single_field_id_is_used_when_no_composite_id_declared() {
    let model = Model::new("User").with_field(id_field("id"));

    assert_eq!(model.primary_key(), PrimaryKey::Single("id".into()));
}

#[test]
fn table_and_column_names_fall_back_to_declared_names() {
    let model = Model::new("User").with_field(Field::new("email", FieldType::new("String")));

    assert_eq!(model.table_name(), "User");
    assert_eq!(model.field("email").unwrap().column_name(), "email");
}

#[test]
fn map_attributes_override_physical_names() {
    let model = Model::new("User")
        .with_attribute(Attribute::with_args(
            "map",
            vec![AttributeArg::unnamed(AttributeValue::String("users".into()))],
        ))
        .with_field(
            Field::new("email", FieldType::new("String")).with_attribute(Attribute::with_args(
                "map",
                vec![AttributeArg::unnamed(AttributeValue::String("email_address".into()))],
            )),
        );

    assert_eq!(model.table_name(), "users");
    assert_eq!(model.field("email").unwrap().column_name(), "email_address");
}

#[test]
fn relation_with_fields_but_no_references_is_virtual() {
    let field = Field::new("author", FieldType::new("Author")).with_attribute(Attribute::with_args(
        "relation",
        vec![AttributeArg::named(
            "fields",
            AttributeValue::List(vec!["authorId".into()]),
        )],
    ));

    assert!(field.relation_info().is_none());
}

#[test]
fn relation_with_fields_and_references_resolves() {
    let field = Field::new("author", FieldType::new("Author")).with_attribute(Attribute::with_args(
        "relation",
        vec![
            AttributeArg::named("fields", AttributeValue::List(vec!["authorId".into()])),
            AttributeArg::named("references", AttributeValue::List(vec!["id".into()])),
            AttributeArg::named("onDelete", AttributeValue::String("Cascade".into())),
        ],
    ));

    let info = field.relation_info().expect("relation should resolve");
    assert_eq!(info.fields, vec!["authorId".to_owned()]);
    assert_eq!(info.references, vec!["id".to_owned()]);
    assert_eq!(info.on_delete, Some(dml::ReferentialAction::Cascade));
}

#[test]
fn array_typed_field_produces_no_column() {
    let schema = Schema::new();
    let field = Field::new("tags", FieldType::new("String").array());

    assert!(field.is_relation_field(&schema));
}

#[test]
fn field_typed_as_a_model_name_produces_no_column() {
    let schema = Schema::new().with_model(Model::new("Author"));
    let field = Field::new("author", FieldType::new("Author"));

    assert!(field.is_relation_field(&schema));
}
