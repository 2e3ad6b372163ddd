//! HTTP client SDK for the Toolhouse Agents platform.
//!
//! A session sends messages to one remote agent and tracks the
//! server-issued run id that threads them into a conversation: the first
//! message creates the conversation, later ones continue it. The reply to
//! each message can be consumed whole or streamed as it arrives.
//!
//! # Example
//!
//! ```no_run
//! use toolhouse_client::AgentSession;
//!
//! # async fn example() -> toolhouse_client::Result<()> {
//! let session = AgentSession::builder("my-agent")
//!     .env("production")
//!     .build();
//!
//! // Await the whole reply...
//! let reply = session.send("Hello!").await?;
//! println!("{}", reply);
//!
//! // ...or stream fragments as the agent produces them.
//! use futures::StreamExt;
//! let mut fragments = session.send("Tell me a story").stream();
//! while let Some(fragment) = fragments.next().await {
//!     print!("{}", fragment?);
//! }
//!
//! // The run id was captured from the first response; later sends
//! // continue the same conversation.
//! println!("conversation: {:?}", session.run_id());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod send;
pub mod session;

mod decode;
mod request;

pub use error::{Error, Result};
pub use send::{FragmentStream, SendRequest};
pub use session::{AgentSession, SessionBuilder};
