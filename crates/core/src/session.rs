mod builder;

pub use builder::ChatSessionBuilder;

use devmind_model::ModelFinishReason;

use crate::capability::CapabilitySet;
use crate::error::Error;
use crate::invoker::ModelInvoker;
use crate::prompt;
use crate::segment::{SegmentedResponse, segment};
use crate::transcript::{Role, Transcript};

/// A chat session, owning the transcript of one conversation.
///
/// Each call to [`ChatSession::on_user_input`] runs one complete cycle:
/// the input is appended, the prompt is compiled from the whole
/// transcript, the model is invoked and its output is segmented and
/// appended. The method borrows the session mutably, so there is never
/// more than one request in flight for a transcript.
pub struct ChatSession {
    invoker: ModelInvoker,
    capabilities: CapabilitySet,
    transcript: Transcript,
    last_response: Option<SegmentedResponse>,
    last_finish_reason: Option<ModelFinishReason>,
}

impl ChatSession {
    fn from_builder(builder: ChatSessionBuilder) -> Self {
        let ChatSessionBuilder {
            invoker,
            capabilities,
        } = builder;
        Self {
            invoker,
            capabilities,
            transcript: Transcript::default(),
            last_response: None,
            last_finish_reason: None,
        }
    }

    /// Handles one user input and returns the segmented model response.
    ///
    /// The assistant turn stores the raw model output, so later prompts
    /// replay exactly what the model said.
    ///
    /// # Errors
    ///
    /// The user turn is committed before the model is invoked. On failure
    /// it stays in the transcript, no assistant turn is appended and the
    /// previous response is kept.
    pub async fn on_user_input<S: Into<String>>(
        &mut self,
        text: S,
    ) -> Result<&SegmentedResponse, Error> {
        let text = text.into();
        self.transcript.append(Role::User, text.as_str());

        let compiled = prompt::compile(&self.capabilities, &self.transcript);
        debug!(turns = self.transcript.len(), "invoking model");
        let raw = match self.invoker.invoke(&compiled, &text).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(kind = %err.kind(), "turn left without an answer");
                return Err(Error::from(err));
            }
        };

        let segmented = segment(raw.text());
        if segmented.reasoning.is_some() {
            trace!("response carries a reasoning segment");
        }
        self.last_finish_reason = raw.finish_reason();
        self.transcript.append(Role::Assistant, raw.into_text());
        Ok(self.last_response.insert(segmented))
    }

    /// Returns the transcript in submission order.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the response of the last successful cycle.
    #[inline]
    pub fn last_response(&self) -> Option<&SegmentedResponse> {
        self.last_response.as_ref()
    }

    /// Returns `true` if the last response was cut off by the model's
    /// token limit.
    #[inline]
    pub fn is_last_response_truncated(&self) -> bool {
        self.last_finish_reason == Some(ModelFinishReason::Length)
    }

    /// Returns the capabilities declared to the model.
    #[inline]
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Starts over with an empty transcript.
    pub fn restart(&mut self) {
        info!(dropped_turns = self.transcript.len(), "restarting session");
        self.transcript = Transcript::default();
        self.last_response = None;
        self.last_finish_reason = None;
    }
}
