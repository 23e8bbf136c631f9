//! Given step definitions

use crate::world::{parse_json, ComparatorWorld};
use cucumber::{gherkin::Step, given};
use haystack::MatcherError;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{Map, Value};

#[given("a comparator with the default matchers")]
async fn default_matchers(_world: &mut ComparatorWorld) {
    // The world starts with the default matchers registered.
}

#[given("a comparator without matchers")]
async fn no_matchers(world: &mut ComparatorWorld) {
    world.without_matchers();
}

#[given(expr = "a matcher {string} that accepts only:")]
async fn custom_matcher(world: &mut ComparatorWorld, name: String, step: &Step) {
    let accepted = match parse_json(step.docstring().expect("Missing docstring")) {
        Value::Array(items) => items,
        other => panic!("Expected a list of accepted values, got {other}"),
    };
    world.comparator.register(name, move |actual: &Value, _: &str| {
        if accepted.contains(actual) {
            Ok(())
        } else {
            Err(MatcherError::custom(format!("{actual} is not accepted")))
        }
    });
}

#[given("the needle:")]
async fn needle(world: &mut ComparatorWorld, step: &Step) {
    world.needle = Some(parse_json(step.docstring().expect("Missing docstring")));
}

#[given("the haystack:")]
async fn haystack(world: &mut ComparatorWorld, step: &Step) {
    world.haystack = Some(parse_json(step.docstring().expect("Missing docstring")));
}

#[given(expr = "a JWT {string} signed with {string} expecting:")]
async fn jwt_expectation(world: &mut ComparatorWorld, name: String, secret: String, step: &Step) {
    let payload = parse_json(step.docstring().expect("Missing docstring"));
    world.tokens.add(name, payload, secret);
}

#[given(expr = "the haystack has a {string} token signed with {string} carrying:")]
async fn haystack_token(world: &mut ComparatorWorld, field: String, secret: String, step: &Step) {
    let claims = parse_json(step.docstring().expect("Missing docstring"));
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token");
    let mut haystack = Map::new();
    haystack.insert(field, Value::String(token));
    world.haystack = Some(Value::Object(haystack));
}
