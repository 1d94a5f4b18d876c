//! Target URL list, file loading, and random selection.
mod list;
mod loader;
mod selector;


pub use list::TargetList;
pub use selector::UrlSelector;
