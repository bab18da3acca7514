use std::pin::Pin;
use std::task::{Context, Poll, ready};

use devmind_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ModelResponseEvent,
};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::Sse;
use crate::proto::ChatCompletionChunk;

struct PartialState {
    sse: Sse,
    id: Option<String>,
    // Cleared after the response returns the completed event.
    pending_finish_reason: Option<ModelFinishReason>,
    // Set once the stream sends `[DONE]` or a finish reason. A body that
    // closes before either is a broken response.
    finished: bool,
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextEvent = Result<(Option<ModelResponseEvent>, PartialState), Error>;

pin_project! {
    pub struct OpenAIResponse {
        next_event_fut: Option<PinnedFuture<NextEvent>>,
    }
}

impl OpenAIResponse {
    #[inline]
    pub fn from_sse(sse: Sse) -> Self {
        let partial_state = PartialState {
            sse,
            id: None,
            pending_finish_reason: None,
            finished: false,
        };
        let next_event_fut = async move { next_event(partial_state).await };
        Self {
            next_event_fut: Some(Box::pin(next_event_fut)),
        }
    }
}

impl ModelResponse for OpenAIResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.project();
        let Some(next_event_fut) = this.next_event_fut else {
            return Poll::Ready(Ok(None));
        };
        let (event, partial_state) =
            match ready!(next_event_fut.as_mut().poll(cx)) {
                Ok((Some(event), partial_state)) => (event, partial_state),
                Ok((None, _)) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        // The stream may still have more data to pull, create a new future for
        // the next event.
        let next_event_fut = async move { next_event(partial_state).await };
        *this.next_event_fut = Some(Box::pin(next_event_fut));

        Poll::Ready(Ok(Some(event)))
    }
}

async fn next_event(
    mut partial_state: PartialState,
) -> Result<(Option<ModelResponseEvent>, PartialState), Error> {
    if let Some(finish_reason) = partial_state.pending_finish_reason.take() {
        return Ok((
            Some(ModelResponseEvent::Completed(finish_reason)),
            partial_state,
        ));
    }

    loop {
        let sse_event = match partial_state.sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) if partial_state.finished => break,
            Ok(None) => {
                return Err(Error::new(
                    "event stream ended unexpectedly",
                    ErrorKind::Other,
                ));
            }
            Err(err) => {
                return Err(Error::new(
                    format!("broken event stream: {err:?}"),
                    ErrorKind::Other,
                ));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            partial_state.finished = true;
            break;
        }

        let mut chunk = serde_json::from_str::<ChatCompletionChunk>(&sse_event)
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
        if partial_state.id.get_or_insert_with(|| chunk.id.clone()) != &chunk.id
        {
            return Err(Error::new("chunk id mismatch", ErrorKind::Other));
        };

        // Usage-only chunks carry no choices.
        let Some(choice) = chunk.choices.pop() else {
            continue;
        };

        if let Some(finish_reason) = choice.finish_reason {
            partial_state.finished = true;
            partial_state.pending_finish_reason = Some(match &*finish_reason {
                "length" => ModelFinishReason::Length,
                "content_filter" => {
                    return Err(Error::new(
                        "response was withheld by content moderation",
                        ErrorKind::Moderated,
                    ));
                }
                _ => ModelFinishReason::Stop,
            });
        }

        // Message deltas are always emitted before the finish reason that
        // may arrive in the same chunk.
        match choice.delta.content {
            Some(content) if !content.is_empty() => {
                return Ok((
                    Some(ModelResponseEvent::MessageDelta(content)),
                    partial_state,
                ));
            }
            _ => {}
        }

        if let Some(finish_reason) = partial_state.pending_finish_reason.take()
        {
            return Ok((
                Some(ModelResponseEvent::Completed(finish_reason)),
                partial_state,
            ));
        }
    }

    Ok((None, partial_state))
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;
    use devmind_model::ModelProviderError;

    use super::*;
    use crate::Chunks;

    async fn drain(
        resp: OpenAIResponse,
    ) -> Result<(String, Option<ModelFinishReason>), Error> {
        let mut resp = pin!(resp);
        let mut text = String::new();
        let mut finish_reason = None;
        while let Some(event) =
            poll_fn(|cx| resp.as_mut().poll_next_event(cx)).await?
        {
            match event {
                ModelResponseEvent::MessageDelta(delta) => {
                    text.push_str(&delta)
                }
                ModelResponseEvent::Completed(reason) => {
                    assert!(finish_reason.is_none());
                    finish_reason = Some(reason);
                }
            }
        }
        Ok((text, finish_reason))
    }

    #[tokio::test]
    async fn test_simple_events() {
        let chunks = Chunks::from_vec_deque(
            vec![Bytes::from_static(include_bytes!(
                "../fixtures/test_response.txt"
            ))]
            .into(),
        );
        let resp = OpenAIResponse::from_sse(Sse::new(chunks));
        let (text, finish_reason) = drain(resp).await.unwrap();
        assert_eq!(
            text,
            "<think>\nThe user wants a greeting.\n</think>\n\nHello there!"
        );
        assert_eq!(finish_reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_content_with_finish_reason() {
        let chunks = Chunks::from_vec_deque(
            vec![Bytes::from_static(
                b"data: {\"id\":\"a\",\"choices\":[{\"delta\":{\"content\":\"Hi\"},\"finish_reason\":\"length\"}]}\n\n",
            )]
            .into(),
        );
        let resp = OpenAIResponse::from_sse(Sse::new(chunks));
        let (text, finish_reason) = drain(resp).await.unwrap();
        assert_eq!(text, "Hi");
        assert_eq!(finish_reason, Some(ModelFinishReason::Length));
    }

    #[tokio::test]
    async fn test_chunk_id_mismatch() {
        let chunks = Chunks::from_vec_deque(
            vec![
                Bytes::from_static(
                    b"data: {\"id\":\"a\",\"choices\":[{\"delta\":{\"content\":\"x\"},\"finish_reason\":null}]}\n\n",
                ),
                Bytes::from_static(
                    b"data: {\"id\":\"b\",\"choices\":[{\"delta\":{\"content\":\"y\"},\"finish_reason\":null}]}\n\n",
                ),
            ]
            .into(),
        );
        let resp = OpenAIResponse::from_sse(Sse::new(chunks));
        let err = drain(resp).await.unwrap_err();
        assert_eq!(err.message(), "chunk id mismatch");
    }

    #[tokio::test]
    async fn test_stream_closed_before_finish() {
        let chunks = Chunks::from_vec_deque(
            vec![Bytes::from_static(
                b"data: {\"id\":\"a\",\"choices\":[{\"delta\":{\"content\":\"Half an ans\"},\"finish_reason\":null}]}\n\n",
            )]
            .into(),
        );
        let resp = OpenAIResponse::from_sse(Sse::new(chunks));
        let err = drain(resp).await.unwrap_err();
        assert_eq!(err.message(), "event stream ended unexpectedly");
        assert_eq!(err.kind(), ErrorKind::Other);

        let resp = OpenAIResponse::from_sse(Sse::new(Chunks::from_vec_deque(
            Default::default(),
        )));
        assert!(drain(resp).await.is_err());
    }

    #[tokio::test]
    async fn test_crlf_framed_stream() {
        let chunks = Chunks::from_vec_deque(
            vec![Bytes::from_static(
                b"data: {\"id\":\"a\",\"choices\":[{\"delta\":{\"content\":\"Hi\"},\"finish_reason\":\"stop\"}]}\r\n\r\ndata: [DONE]\r\n\r\n",
            )]
            .into(),
        );
        let resp = OpenAIResponse::from_sse(Sse::new(chunks));
        let (text, finish_reason) = drain(resp).await.unwrap();
        assert_eq!(text, "Hi");
        assert_eq!(finish_reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_content_filter() {
        let chunks = Chunks::from_vec_deque(
            vec![Bytes::from_static(
                b"data: {\"id\":\"a\",\"choices\":[{\"delta\":{},\"finish_reason\":\"content_filter\"}]}\n\n",
            )]
            .into(),
        );
        let resp = OpenAIResponse::from_sse(Sse::new(chunks));
        let err = drain(resp).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Moderated);
    }
}
