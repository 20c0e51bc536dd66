pub(crate) mod sources;
pub(crate) mod stateful;
pub(crate) mod stateless;
pub(crate) mod terminal;

// Only re-export files with top-level functions
pub use sources::*;
