//! Cucumber BDD behaviour tests for the haystack comparator
//!
//! Run with: cargo test --test conformance

use cucumber::{writer, World, WriterExt};
use haystack_conformance_tests::world::ComparatorWorld;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // RUST_LOG=haystack=trace shows the candidates rejected during list probing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    ComparatorWorld::cucumber()
        .before(|_feature, _rule, scenario, _world| {
            Box::pin(async move {
                tracing::debug!("Starting scenario: {}", scenario.name);
            })
        })
        .with_writer(
            writer::Basic::stdout()
                .summarized()
                .assert_normalized(),
        )
        .fail_on_skipped()
        .filter_run_and_exit("features/", |_, _, sc| {
            // Skip scenarios tagged with @skip
            !sc.tags.iter().any(|t| t == "skip")
        })
        .await;
}
