pub mod common;
pub mod generate;
pub mod mcp;
pub mod schema;
pub mod stats;
