use crate::cli::flags::Server;
use crate::stdio::ConsoleDriver;
use crate::{Command, CommandInvocationError};
use scaf_abstractions::tracing::subscriber;
use scaf_host::tracing::{
	tracing_subscriber::{fmt::layer, prelude::*, Registry},
	LspTracingLayer,
};
use scaf_host::ScafHost;
use async_trait::async_trait;
use cancellation::CancellationToken;
use std::sync::Arc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// A scaf command that starts the Language Server Protocol (LSP) server implementation.
pub struct LspServerCommand {
	dialect: String,
	#[allow(dead_code)]
	config: Server,
}

impl LspServerCommand {
	/// Initializes a new [`LspServerCommand`] instance for the given query dialect (spec.md §4.J).
	pub fn new(dialect: String, config: Server) -> Self {
		LspServerCommand { dialect, config }
	}
}

#[async_trait]
impl Command for LspServerCommand {
	/// Runs the command by delegating to a scaf Host.
	async fn run(&self, cancel_token: &CancellationToken) -> Result<(), CommandInvocationError> {
		let console = ConsoleDriver::new();
		// TODO: Configure the rolling file appender layer using command configuration.
		let trace_appender = RollingFileAppender::new(Rotation::NEVER, ".", "scaf.log");
		let (non_blocking, _guard) = tracing_appender::non_blocking(trace_appender);
		let layer = layer().with_writer(non_blocking);

		let tracing_layer = LspTracingLayer::new(console.get_message_channel());
		let trace_value = tracing_layer.trace_value();

		let subscriber = Registry::default().with(layer).with(tracing_layer);

		subscriber::set_global_default(subscriber)
			.expect("Unable to set global tracing subscriber.");

		let host = ScafHost::new(console.get_message_channel(), Some(trace_value), self.dialect.clone());
		let cancel_token = Arc::new(cancel_token.clone());

		match tokio::join!(host.start(cancel_token.clone()), console.start(cancel_token)) {
			(Ok(_), Ok(_)) => Ok(()),
			_ => Err(CommandInvocationError::Cancelled),
		}
	}
}
