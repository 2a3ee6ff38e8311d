mod delta;

pub use delta::{find_changes, find_changes_with_definitions};
