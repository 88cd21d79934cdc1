//! # warden-walk
//!
//! Directory hierarchy operations for Warden: flat listing, recursive
//! tree construction, and name search with exclusion patterns.
//!
//! The recursive operations never trust a path twice. `tree` re-validates
//! every directory before descending (and fails loudly when validation
//! fails); `search` re-validates every entry and silently skips the ones
//! that no longer check out, so one hostile or dangling entry cannot
//! abort a whole search. Both walk with explicit work stacks instead of
//! recursion, so adversarially deep hierarchies cannot blow the call
//! stack.

pub mod error;
pub mod search;
pub mod types;
pub mod walker;

pub use error::WalkError;
pub use search::search;
pub use types::{DirEntry, EntryKind, TreeNode};
pub use walker::{list, tree};
