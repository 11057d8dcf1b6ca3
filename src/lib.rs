//! Rust client for the Z.AI multimodal API.
//!
//! The crate wraps the **v4** REST endpoints: chat (with thinking, tool calling
//! and web search), vision, image generation, video generation and audio
//! transcription. [`Config`] resolves the API key and defaults,
//! [`v4::rest::Client`] talks to the service, [`media`] turns local files into
//! request payloads, and [`dispatch`] offers a single entry point over every
//! modality in blocking or streaming form.
//!
//! ## Example
//!
//! ```no_run
//! use zai::{Config, dispatch::Task, v4::{Message, request::ChatRequest, rest::Client}};
//!
//! # async fn run() -> Result<(), zai::Error> {
//! let client = Client::new(Config::from_env()?)?;
//! let request = ChatRequest::new("glm-4.7", vec![Message::user("Hello")])
//!     .with_max_tokens(64u32);
//!
//! let output = client.dispatch(Task::Chat(request)).await?;
//! println!("{:?}", output.text());
//! # Ok(())
//! # }
//! ```
//!
//! See the `demos` directory for runnable programs covering each modality.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod media;
pub mod v4;

pub use config::Config;
pub use error::{Error, Result};
