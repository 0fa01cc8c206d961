//! Base types and utilities shared by every scaf language server crate.
//!
//! Nothing in this crate depends on `scaf-core` or `scaf-host`; it exists purely so that
//! downstream crates pin one version of `lsp-types`, `async-trait` and `tracing`, and share
//! the small set of async helpers (`FutureCompletionSource`, `BoxFuture`, `AsyncPool`) that
//! the host and the import resolver both need.

pub mod fs;
pub mod futures_extensions;

// Re-export so downstream crates depend on one pinned version of each.
pub use async_trait;
pub use lsp_types;
pub use tracing;

use std::{future::Future, pin::Pin};

/// A boxed, pinned future. Matches the signature expected by [`dyn_clonable`]-wrapped handler
/// traits in `scaf-host`, which must store futures of differing concrete types behind one pointer.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + Sync + 'a>>;

/// A sink that a component can log human-readable diagnostics to without depending on `tracing`
/// directly. Implemented by the host's bounded logging sink.
pub trait Logger {
	fn log_message(&self, msg: &str);

	fn log_error(&self, msg: &str);
}

pub type LoggerImpl = dyn Logger + Send + Sync;
