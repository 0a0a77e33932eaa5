mod support;

use gqlcypher::{
    schema::{
        AuthorizationRule, Entity, Field, Operation as RuleOperation, RuleCondition, Scalar,
        When,
    },
    stmt::Value,
    Compiler, Context, Operation, Request, ResolveTree, Schema,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Posts only their author may read, and only editors may delete.
fn owned_posts() -> Schema {
    Schema::builder()
        .entity(
            Entity::new("Post")
                .field(Field::primitive("content", Scalar::String))
                .field(Field::primitive("authorId", Scalar::ID))
                .rule(
                    AuthorizationRule::filter(RuleCondition::node(json!({ "authorId": "$jwt.sub" })))
                        .operations([RuleOperation::Read]),
                )
                .rule(
                    AuthorizationRule::validate(When::Before, RuleCondition::roles(["editor"]))
                        .operations([RuleOperation::Delete]),
                ),
        )
        .build()
        .unwrap()
}

fn read_posts() -> Request {
    Request::new(
        Operation::Read,
        "Post",
        ResolveTree::new("posts").field("Post", ResolveTree::new("content")),
    )
}

#[test]
fn filter_rule_narrows_to_the_caller() {
    let cx = Context::authenticated(json!({ "sub": "user-1" }));
    let query = support::compile(owned_posts(), &read_posts(), &cx).unwrap();

    assert_eq!(
        query.cypher,
        "MATCH (this:Post)\nWHERE this.authorId = $this_authorId\nRETURN this { .content } AS this"
    );
    assert_eq!(query.params.get("this_authorId"), Some(&Value::from("user-1")));
}

#[test]
fn missing_claim_matches_nothing() {
    let query = support::compile(owned_posts(), &read_posts(), &Context::anonymous()).unwrap();

    assert_eq!(
        query.cypher,
        "MATCH (this:Post)\nWHERE false\nRETURN this { .content } AS this"
    );
    assert!(query.params.is_empty());
}

#[test]
fn role_rule_becomes_an_assertion() {
    let request = Request::new(Operation::Delete, "Post", ResolveTree::new("deletePosts"));
    let cx = Context::authenticated(json!({ "sub": "user-1", "roles": ["reader"] }));
    let query = support::compile(owned_posts(), &request, &cx).unwrap();

    let assertion = query
        .cypher
        .find("apoc.util.validatePredicate")
        .expect("assertion");
    let delete = query.cypher.find("DETACH DELETE this").expect("delete");
    assert!(assertion < delete, "{}", query.cypher);
    assert!(query.cypher.contains("@gqlcypher/FORBIDDEN"));

    assert_eq!(query.params.get("roles"), Some(&Value::from(json!(["editor"]))));
    assert_eq!(
        query.params.get("jwt").and_then(|jwt| jwt.get("sub")),
        Some(&Value::from("user-1"))
    );
}

#[test]
fn global_authentication_rejects_anonymous_requests() {
    let compiler = Compiler::builder()
        .schema(owned_posts())
        .global_authentication(true)
        .build()
        .unwrap();

    let err = compiler.compile(&read_posts(), &Context::anonymous()).unwrap_err();
    assert!(err.is_forbidden());

    let cx = Context::authenticated(json!({ "sub": "user-1" }));
    assert!(compiler.compile(&read_posts(), &cx).is_ok());
}

#[test]
fn authenticated_rule_checks_the_flag() {
    let schema = Schema::builder()
        .entity(
            Entity::new("Secret")
                .field(Field::primitive("value", Scalar::String))
                .rule(AuthorizationRule::authenticated()),
        )
        .build()
        .unwrap();
    let request = Request::new(
        Operation::Read,
        "Secret",
        ResolveTree::new("secrets").field("Secret", ResolveTree::new("value")),
    );

    let query = support::compile(schema, &request, &Context::anonymous()).unwrap();
    assert!(query.cypher.contains("$isAuthenticated = true"), "{}", query.cypher);
    assert_eq!(query.params.get("isAuthenticated"), Some(&Value::Bool(false)));
}

#[test]
fn connect_or_create_checks_roles_before_merging() {
    let request = Request::new(
        Operation::Create,
        "Movie",
        ResolveTree::new("createMovies")
            .arg(
                "input",
                json!([{
                    "title": "The Matrix",
                    "genres": {
                        "connectOrCreate": [{
                            "where": { "node": { "name": "Action" } },
                            "onCreate": { "node": { "name": "Action" } }
                        }]
                    }
                }]),
            )
            .field(
                "CreateMoviesMutationResponse",
                ResolveTree::new("movies").field("Movie", ResolveTree::new("title")),
            ),
    );
    let cx = Context::authenticated(json!({ "roles": ["viewer"] }));
    let query = support::compile(support::movies(), &request, &cx).unwrap();

    let assertion = query
        .cypher
        .find("apoc.util.validatePredicate")
        .expect("assertion");
    let merge = query.cypher.find("MERGE (").expect("merge");
    assert!(assertion < merge, "{}", query.cypher);
    assert!(query.cypher.contains(":Genre { name: $"), "{}", query.cypher);
    assert!(query.cypher.contains("-[:IN_GENRE]->"), "{}", query.cypher);
    assert_eq!(query.params.get("roles"), Some(&Value::from(json!(["admin"]))));
}

#[test]
fn connect_or_create_requires_unique_fields() {
    let request = Request::new(
        Operation::Create,
        "Movie",
        ResolveTree::new("createMovies").arg(
            "input",
            json!([{
                "title": "The Matrix",
                "genres": {
                    "connectOrCreate": [{ "where": { "node": { "title": "Action" } } }]
                }
            }]),
        ),
    );
    let cx = Context::authenticated(json!({ "roles": ["admin"] }));
    let err = support::compile(support::movies(), &request, &cx).unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn invalid_rules_are_rejected_by_the_schema() {
    let err = Schema::builder()
        .entity(
            Entity::new("Post")
                .field(Field::primitive("content", Scalar::String))
                .rule(
                    AuthorizationRule::filter(RuleCondition::node(json!({ "content": "x" })))
                        .operations([RuleOperation::Create]),
                ),
        )
        .build()
        .unwrap_err();
    assert!(err.is_invalid_rule());
}

/// Posts hidden from the user they block.
fn blocking_posts() -> Schema {
    Schema::builder()
        .entity(
            Entity::new("Post")
                .field(Field::primitive("content", Scalar::String))
                .field(Field::primitive("blockedId", Scalar::ID))
                .rule(
                    AuthorizationRule::filter(RuleCondition::negate(RuleCondition::node(
                        json!({ "blockedId": "$jwt.sub" }),
                    )))
                    .operations([RuleOperation::Read]),
                ),
        )
        .build()
        .unwrap()
}

#[test]
fn negated_rule_with_missing_claim_matches_nothing() {
    let query = support::compile(blocking_posts(), &read_posts(), &Context::anonymous()).unwrap();

    assert_eq!(
        query.cypher,
        "MATCH (this:Post)\nWHERE NOT (true)\nRETURN this { .content } AS this"
    );
    assert!(query.params.is_empty());

    let cx = Context::authenticated(json!({ "sub": "user-1" }));
    let query = support::compile(blocking_posts(), &read_posts(), &cx).unwrap();

    assert_eq!(
        query.cypher,
        "MATCH (this:Post)\nWHERE NOT (this.blockedId = $this_blockedId)\nRETURN this { .content } AS this"
    );
}

#[test]
fn double_negation_with_missing_claim_matches_nothing() {
    let schema = Schema::builder()
        .entity(
            Entity::new("Post")
                .field(Field::primitive("content", Scalar::String))
                .field(Field::primitive("authorId", Scalar::ID))
                .rule(
                    AuthorizationRule::filter(RuleCondition::negate(RuleCondition::any([
                        RuleCondition::negate(RuleCondition::node(json!({ "authorId": "$jwt.sub" }))),
                        RuleCondition::node(json!({ "authorId": "$jwt.sub" })),
                    ])))
                    .operations([RuleOperation::Read]),
                ),
        )
        .build()
        .unwrap();

    let query = support::compile(schema, &read_posts(), &Context::anonymous()).unwrap();

    // Both unresolved references lower to literals that keep the rule failing
    assert_eq!(
        query.cypher,
        "MATCH (this:Post)\nWHERE NOT (NOT (false) OR true)\nRETURN this { .content } AS this"
    );
}
