// Storage module entry point
// Path sandboxing and the mirror-source fetcher

pub mod mirror;
pub mod path;

pub use path::resolve;
