//! Data types for the link-directory page.

mod card;
mod item;
mod node;

pub use card::*;
pub use item::*;
pub use node::*;

/// Helper function for serde skip_serializing_if
pub(crate) fn is_false(b: &bool) -> bool {
    !b
}
