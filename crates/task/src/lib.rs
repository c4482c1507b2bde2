mod query;
pub(crate) mod repository;
mod root;
mod types;

pub use query::*;
pub use root::*;
pub use types::*;
