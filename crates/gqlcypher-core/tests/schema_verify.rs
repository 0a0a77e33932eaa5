use gqlcypher_core::schema::{
    AuthorizationRule, Entity, Field, Interface, Relationship, RuleCondition, Scalar, Union,
};
use gqlcypher_core::Schema;

#[test]
fn relationship_to_unknown_entity() {
    let err = Schema::builder()
        .entity(Entity::new("Post").field(Field::relationship(
            "author",
            Relationship::incoming("WROTE", "Person").one(),
        )))
        .build()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid schema: relationship `Post.author` targets unknown type `Person`"
    );
}

#[test]
fn duplicate_type_names() {
    let err = Schema::builder()
        .entity(Entity::new("Movie"))
        .union(Union::new("Movie", ["Movie"]))
        .build()
        .unwrap_err();

    assert!(err.is_invalid_schema());
}

#[test]
fn interface_implementations_follow_entity_order() {
    let schema = Schema::builder()
        .interface(Interface::new("Production").field(Field::primitive("title", Scalar::String)))
        .entity(
            Entity::new("Series")
                .implements("Production")
                .field(Field::primitive("title", Scalar::String)),
        )
        .entity(
            Entity::new("Movie")
                .implements("Production")
                .field(Field::primitive("title", Scalar::String)),
        )
        .build()
        .unwrap();

    assert_eq!(
        schema.interface("Production").unwrap().implementations,
        ["Series", "Movie"]
    );
}

#[test]
fn implementation_must_declare_interface_fields() {
    let err = Schema::builder()
        .interface(Interface::new("Production").field(Field::primitive("title", Scalar::String)))
        .entity(Entity::new("Movie").implements("Production"))
        .build()
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("does not declare field `title`"));
}

#[test]
fn malformed_field_rule_fails_the_build() {
    let err = Schema::builder()
        .entity(
            Entity::new("User").field(
                Field::primitive("password", Scalar::String)
                    .rule(AuthorizationRule::filter(RuleCondition::roles(["admin"]))),
            ),
        )
        .build()
        .unwrap_err();

    assert!(err.is_invalid_rule());
    assert!(err.to_string().contains("`User.password`"));
}

#[test]
fn concrete_targets_of_union_field() {
    let schema = Schema::builder()
        .entity(Entity::new("Movie"))
        .entity(Entity::new("Series"))
        .union(Union::new("Production", ["Series", "Movie"]))
        .entity(Entity::new("Actor").field(Field::union(
            "actedIn",
            Relationship::outgoing("ACTED_IN", "Production"),
        )))
        .build()
        .unwrap();

    let actor = schema.entity("Actor").unwrap();
    let targets: Vec<_> = schema
        .concrete_targets(actor.find_field("actedIn").unwrap())
        .into_iter()
        .map(|entity| entity.name.as_str())
        .collect();

    assert_eq!(targets, ["Series", "Movie"]);
    assert_eq!(
        schema.entity_by_root_field("actors").map(|e| e.name.as_str()),
        Some("Actor")
    );
}
