//! Purpose: Define the public client surface for calling the bot protocol.
//! Exports: Transport seam, HTTP transport, config, and typed domain operations.
//! Role: Public, additive-only surface; the schema engine stays under `core`.
//! Invariants: Clients are passed explicitly; no global or lazily-created instance.
//! Invariants: Every typed result is produced by the descriptor-driven builder.

mod client;
mod config;
mod remote;

pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use client::{
    AudioDetails, BotApi, ChatActions, ChatId, SendOptions, UpdatesOptions, VideoDetails,
    VideoNoteDetails,
};
pub use config::{API_URL_ENV, ApiConfig, DEFAULT_API_URL, TIMEOUT_ENV, TOKEN_ENV};
pub use remote::{HttpInvoker, RemoteInvoker};
