pub mod errors;
pub mod index;
pub mod mcp;
pub mod ops;
pub mod paging;
pub mod resolver;
pub mod snapshot;
pub mod types;
