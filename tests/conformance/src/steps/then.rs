//! Then step definitions

use crate::world::{parse_kind, ComparatorWorld};
use cucumber::then;

#[then("the haystack contains the needle")]
async fn contained(world: &mut ComparatorWorld) {
    match world.outcome.as_ref().expect("No comparison was run") {
        Ok(()) => {}
        Err(err) => panic!("Expected the needle to be contained:\n{err}"),
    }
}

#[then(expr = "the comparison fails with {word}")]
async fn fails_with(world: &mut ComparatorWorld, kind: String) {
    let err = world.failure();
    assert_eq!(err.kind(), parse_kind(&kind), "Unexpected failure:\n{err}");
}

#[then(expr = "the failure path is {string}")]
async fn failure_path(world: &mut ComparatorWorld, path: String) {
    assert_eq!(world.failure().path_string(), path);
}

#[then(expr = "the failure message is {string}")]
async fn failure_message(world: &mut ComparatorWorld, message: String) {
    assert_eq!(world.failure().message(), message);
}

#[then(expr = "the failure message contains {string}")]
async fn failure_message_contains(world: &mut ComparatorWorld, text: String) {
    let message = world.failure().message();
    assert!(
        message.contains(&text),
        "Expected {message:?} to contain {text:?}"
    );
}

#[then(expr = "the matcher reported {string}")]
async fn matcher_reported(world: &mut ComparatorWorld, text: String) {
    let cause = world
        .failure()
        .matcher_error()
        .expect("The failure has no matcher cause");
    assert_eq!(cause.to_string(), text);
}
