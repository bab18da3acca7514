//! An abstraction layer for hosted chat models.
//!
//! This crate establishes a small protocol between the chat core and the
//! remote model services it talks to, so that the core never depends on
//! the wire format of a particular provider.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
