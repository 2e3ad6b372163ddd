//! Dual-mode send: one pending message, two ways to consume the reply.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt, TryFutureExt, TryStreamExt};

use crate::decode::Utf8Decoder;
use crate::error::{Error, Result};
use crate::request::MessageBody;
use crate::session::SessionInner;

/// A finite, forward-only stream of decoded reply fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'static>>;

/// A message handed to [`AgentSession::send`], not yet on the wire.
///
/// Consume it either way:
///
/// - **Await it** (or call [`text`](Self::text)) for the whole reply as one
///   string.
/// - **Call [`stream`](Self::stream)** for reply fragments as they arrive.
///
/// Each consumption issues its own independent request using the session
/// state current at that moment; nothing is cached or replayed. A stream is
/// single-pass: to re-read, issue another consumption.
///
/// [`AgentSession::send`]: crate::AgentSession::send
pub struct SendRequest {
    session: Arc<SessionInner>,
    message: String,
}

impl SendRequest {
    pub(crate) fn new(session: Arc<SessionInner>, message: String) -> Self {
        Self { session, message }
    }

    fn body(&self) -> MessageBody {
        MessageBody {
            message: self.message.clone(),
        }
    }

    /// Send the message and materialize the whole reply.
    ///
    /// Drains the response body, decoding chunks statefully so multi-byte
    /// characters split across chunk boundaries come through intact. The
    /// response (and its connection) is released when this returns or when
    /// the future is dropped, on success and error alike.
    pub async fn text(&self) -> Result<String> {
        let response = self.session.execute(&self.body()).await?;

        let mut decoder = Utf8Decoder::new();
        let mut chunks = response.bytes_stream();
        let mut text = String::new();
        while let Some(chunk) = chunks.next().await {
            text.push_str(&decoder.decode(&chunk?));
        }
        Ok(text)
    }

    /// Send the message and stream the reply incrementally.
    ///
    /// Lazy: the request goes out when the stream is first polled, and any
    /// failure, whether before or during the body, arrives through the
    /// stream's error channel. Empty decodes (an incomplete multi-byte
    /// suffix held back by the decoder) are never surfaced. Dropping the
    /// stream at any point releases the underlying response.
    pub fn stream(&self) -> FragmentStream {
        let session = self.session.clone();
        let body = self.body();

        let opened = async move {
            let response = session.execute(&body).await?;
            Ok(fragments(response.bytes_stream().map_err(Error::from)))
        };
        Box::pin(opened.try_flatten_stream())
    }
}

impl IntoFuture for SendRequest {
    type Output = Result<String>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<String>> + Send + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.text().await })
    }
}

/// Decode a byte-chunk stream into non-empty text fragments.
fn fragments<S, B>(bytes: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = Result<B>>,
    B: AsRef<[u8]>,
{
    let mut decoder = Utf8Decoder::new();
    bytes
        .map(move |chunk| chunk.map(|bytes| decoder.decode(bytes.as_ref())))
        .filter(|item| futures::future::ready(!matches!(item, Ok(text) if text.is_empty())))
}
