//! A terminal chat with a hosted reasoning model.
//!
//! The crate wires [`devmind_core`] to the OpenAI-compatible provider and
//! adds what the terminal front end needs: settings, the fixed choices
//! offered to the person chatting, input parsing and rendering. It can be
//! used as a library to embed the same chat in another host.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod catalog;
pub mod command;
pub mod render;
pub mod settings;

use devmind_core::{ChatSession, ChatSessionBuilder};
use devmind_openai_model::OpenAIProvider;

pub use settings::{Settings, SettingsError};

/// Re-exports of [`devmind_core`] crate.
pub mod core {
    pub use devmind_core::*;
}

/// Creates a chat session talking to the model chosen in `settings`.
pub fn build_session(settings: &Settings) -> ChatSession {
    let config = settings.provider_config();
    debug!(?config, "creating chat session");
    ChatSessionBuilder::with_model_provider(OpenAIProvider::new(config))
        .with_capabilities(settings.capabilities.clone())
        .build()
}
