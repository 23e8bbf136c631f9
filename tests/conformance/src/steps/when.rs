//! When step definitions

use crate::world::ComparatorWorld;
use cucumber::when;

#[when("the needle is compared with the haystack")]
async fn compare(world: &mut ComparatorWorld) {
    world.compare();
}
