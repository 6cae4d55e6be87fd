//! Service layer providing the user registry use cases on top of `models`.
//! - Storage is whole-collection: every use case loads the document and
//!   every mutation rewrites it.
//! - Storage backends sit behind the `storage::UserStore` trait.
//! - Errors are typed (`errors::ServiceError`); no recovery happens here.

pub mod errors;
pub mod filter;
pub mod runtime;
pub mod storage;
pub mod user_service;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use filter::{ListFilter, Listing};
pub use user_service::{UpdateMode, UserService};
