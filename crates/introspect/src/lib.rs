//! GraphQL introspection query execution.
//!
//! This crate fetches schemas from remote endpoints via the standard
//! introspection query and deserializes the payload into a typed model.
//!
//! # Examples
//!
//! ```no_run
//! use graphql_introspect::IntrospectionClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IntrospectionClient::new()
//!         .with_header("Authorization", "Bearer my-token")
//!         .with_timeout(Duration::from_secs(60))
//!         .with_retries(3);
//!
//!     let response = client.execute("https://api.example.com/graphql").await?;
//!     println!("{} types", response.data.schema.types.len());
//!     Ok(())
//! }
//! ```
//!
//! Payloads obtained some other way (a file, a cache) go through
//! [`IntrospectionResponse::from_json_str`].

mod client;
mod error;
mod query;
mod types;

pub use client::{IntrospectionClient, DEFAULT_TIMEOUT_SECS};
pub use error::{IntrospectionError, Result};
pub use query::{introspection_request_body, INTROSPECTION_QUERY};
pub use types::*;
