//! An incremental syntax validator for a restricted JSON grammar.
//!
//! Input is fed one character at a time, from chunks of any size, and the
//! validator keeps a running [`Status`] of everything seen so far: empty,
//! valid, incomplete or invalid. Nothing is parsed into values and nothing is
//! re-read; memory is bounded by the nesting depth.
//!
//! The grammar is JSON restricted to objects, arrays and strings: the
//! document is an object, keys are identifiers, values are strings or
//! non-empty nested containers. [`ValidatorOptions`] relaxes each of these
//! rules individually.
//!
//! ```rust
//! use jsonsieve::{Status, Validator};
//!
//! let mut validator = Validator::new();
//! for c in r#"{"name":"sieve","tags":["json"]}"#.chars() {
//!     validator.accept(c).unwrap();
//! }
//! assert_eq!(validator.status(), Status::Valid);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod options;
mod validator;

#[cfg(test)]
mod tests;

pub use error::{ErrorKind, Position, ValidationError};
pub use options::{DEFAULT_MAX_DEPTH, KeyFormat, ValidatorOptions};
pub use validator::{Status, Validator, validate};
