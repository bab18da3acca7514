//! Core logic of the chat: transcript, prompt compilation, model
//! invocation and response segmentation.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod capability;
mod error;
mod invoker;
pub mod prompt;
pub mod segment;
mod session;
pub mod transcript;

pub use capability::CapabilitySet;
pub use error::Error;
pub use invoker::{ModelInvoker, RawModelResponse};
pub use segment::SegmentedResponse;
pub use session::{ChatSession, ChatSessionBuilder};
pub use transcript::{Role, Transcript, Turn};
