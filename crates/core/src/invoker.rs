use std::future::poll_fn;
use std::pin::{Pin, pin};
use std::sync::Arc;

use devmind_model::{
    ModelFinishReason, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse, ModelResponseEvent,
};
use tracing::Instrument;

use crate::prompt::CompiledPrompt;

type InvokeResult = Result<RawModelResponse, Box<dyn ModelProviderError>>;
type BoxedInvokeFuture = Pin<Box<dyn Future<Output = InvokeResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedInvokeFuture + Send + Sync>;

/// Sends compiled prompts to a model provider and collects the output.
///
/// This wraps any [`ModelProvider`] behind a type-erased interface, so the
/// session doesn't need a generic parameter. It is stateless, and failed
/// requests are returned as is without any retry.
#[derive(Clone)]
pub struct ModelInvoker {
    handler_fn: HandlerFn,
}

impl ModelInvoker {
    /// Creates an invoker backed by `provider`.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("sending {} messages", req.messages.len());
                    let resp_or_err = fut.await;
                    handle_response::<P>(resp_or_err).await
                }
                .instrument(trace_span!("model invocation")),
            )
        });
        Self { handler_fn }
    }

    /// Sends `prompt` with `latest_input` bound as its trailing user
    /// message, and waits for the complete output.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The response stops streaming further
    /// events when this operation is cancelled.
    #[inline]
    pub async fn invoke(
        &self,
        prompt: &CompiledPrompt,
        latest_input: &str,
    ) -> InvokeResult {
        let req = prompt.clone().into_request(latest_input);
        (self.handler_fn)(req).await
    }
}

/// The complete, unparsed output of one model invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawModelResponse {
    text: String,
    finish_reason: Option<ModelFinishReason>,
}

impl RawModelResponse {
    /// Returns the output text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns why the model stopped, if the provider reported it.
    #[inline]
    pub fn finish_reason(&self) -> Option<ModelFinishReason> {
        self.finish_reason
    }

    /// Consumes the response and returns the output text.
    #[inline]
    pub fn into_text(self) -> String {
        self.text
    }
}

async fn handle_response<P: ModelProvider + 'static>(
    resp_or_err: Result<P::Response, P::Error>,
) -> InvokeResult {
    let resp = match resp_or_err {
        Ok(resp) => resp,
        Err(err) => {
            error!("model request failed: {err}");
            return Err(Box::new(err));
        }
    };

    let mut text = String::new();
    let mut finish_reason = None;

    let mut pinned_resp = pin!(resp);
    loop {
        let event_or_err =
            poll_fn(|cx| pinned_resp.as_mut().poll_next_event(cx)).await;
        let event = match event_or_err {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                error!("model response failed: {err}");
                return Err(Box::new(err));
            }
        };
        trace!("got an event: {event:?}");

        match event {
            ModelResponseEvent::MessageDelta(delta) => text.push_str(&delta),
            ModelResponseEvent::Completed(reason) => {
                finish_reason = Some(reason);
            }
        }
    }

    if finish_reason == Some(ModelFinishReason::Length) {
        warn!("model output was truncated by the token limit");
    }
    debug!("received {} bytes of model output", text.len());

    Ok(RawModelResponse {
        text,
        finish_reason,
    })
}
