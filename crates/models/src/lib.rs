//! Entity definitions for the user registry.
//! - `user`: the persisted record, the pre-validation candidate and the validator.
//! - `payload`: request body decoding (JSON / urlencoded form).
//! - `errors`: client-facing rejection reasons.

pub mod errors;
pub mod payload;
pub mod user;

pub use errors::ModelError;
pub use payload::{ContentKind, Payload};
pub use user::{User, UserCandidate, ValidatedUser};
