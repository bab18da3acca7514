use devmind_model::ModelProvider;

use super::ChatSession;
use crate::capability::CapabilitySet;
use crate::invoker::ModelInvoker;

/// [`ChatSession`] builder.
pub struct ChatSessionBuilder {
    pub(crate) invoker: ModelInvoker,
    pub(crate) capabilities: CapabilitySet,
}

impl ChatSessionBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            invoker: ModelInvoker::new(provider),
            capabilities: CapabilitySet::default(),
        }
    }

    /// Sets the capabilities declared in the system directive.
    #[inline]
    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Builds the session with an empty transcript.
    #[inline]
    pub fn build(self) -> ChatSession {
        ChatSession::from_builder(self)
    }
}
