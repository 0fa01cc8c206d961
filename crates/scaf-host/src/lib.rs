mod fs;
mod fsm;
pub mod lsp;
mod lsp_impl;
#[cfg(test)]
mod tests;
pub mod json_rpc;
pub mod tracing;

use std::sync::Arc;
use scaf_abstractions::{fs::AnyEnumerableFileSystem, tracing::*};
use async_channel::{Receiver, Sender};
use cancellation::{CancellationToken, OperationCanceled};
use fs::LspEnumerableFileSystem;
use fsm::LspProtocolMachine;
use futures::{future::FutureExt, pin_mut, select};
use json_rpc::message::Message;
use lsp::request::RequestManager;
use tracing::TraceValueAccessor;

/// A tuple type that represents both a sender and a receiver of [`Message`] instances.
pub type MessageChannel = (Sender<Message>, Receiver<Message>);

/// Provides a runtime environment for the scaf, utilizing services that are provided by the host process.
pub struct ScafHost {
	sender: Sender<Message>,
	receiver: Receiver<Message>,
	trace_value: Option<TraceValueAccessor>,
	dialect: String
}

impl ScafHost {
	/// Initializes a new [`ScafHost`] instance with a [`MessageChannel`] to send and receive Language Server Protocol (LSP)
	/// messages over, an optional [`TraceValueAccessor`] that can be used to set the LSP tracing value, and the name of
	/// the query dialect (spec.md §4.J) to use for embedded query bodies.
	///
	/// If available, `trace_value` will be used on receipt of a `'$/setTrace'` notification from the LSP client to set
	/// the required logging level.
	pub fn new(request_channel: MessageChannel, trace_value: Option<TraceValueAccessor>, dialect: String) -> Self {
		let (sender, receiver) = request_channel;

		ScafHost {
			sender,
			receiver,
			trace_value,
			dialect
		}
	}

	/// Starts executing the the [`ScafHost`] instance.
	///
	/// Once started, request messages will be received through the message channel, forwarded for processing to the internal
	/// state machine, with response messages sent back through the message channel for the client to process.
	pub async fn start(&self, cancel_token: Arc<CancellationToken>) -> Result<(), OperationCanceled> {
		info!("ScafHost is starting.");

		// Server-initiated requests (e.g. `scaf/enumerateFolder`) and the inbound responses to them are multiplexed
		// over the same wire as client requests, so incoming `Response` messages are redirected to this channel for
		// the `RequestManager` to pick up, while everything else is handled by the protocol machine below.
		let (response_sender, response_receiver) = async_channel::unbounded::<Message>();
		let request_manager = RequestManager::new((self.sender.clone(), response_receiver));
		let file_system: Arc<AnyEnumerableFileSystem> = Arc::new(Box::new(LspEnumerableFileSystem::new(request_manager.clone())));

		let mut protocol_machine =
			LspProtocolMachine::new(self.trace_value.clone(), request_manager.clone(), file_system, &self.dialect);

		let request_manager_loop = request_manager.start(cancel_token.clone()).fuse();
		let message_loop = self.process_messages(&mut protocol_machine, &response_sender, cancel_token.clone()).fuse();

		pin_mut!(request_manager_loop, message_loop);

		let result = select! {
			result = message_loop => result,
			result = request_manager_loop => result,
		};

		response_sender.close();

		info!("ScafHost is stopping.");

		result
	}

	async fn process_messages(
		&self,
		protocol_machine: &mut LspProtocolMachine,
		response_sender: &Sender<Message>,
		cancel_token: Arc<CancellationToken>
	) -> Result<(), OperationCanceled> {
		while protocol_machine.is_active() && !cancel_token.is_canceled() {
			let request_message = self.receiver.recv().await;

			if cancel_token.is_canceled() {
				break;
			}

			match request_message {
				Ok(message) => {
					// Responses to server-initiated requests belong to the `RequestManager`, not the protocol machine.
					if let Message::Response(_) = &message {
						let _ = response_sender.send(message).await;

						continue;
					}

					let message = Arc::new(message);
					let request_message_span = info_span!("[Message]", message = format!("{}", message));

					async {
						match protocol_machine.process_message(message).await {
							Ok(response_message) => {
								if let Some(Message::Response(_)) = &response_message {
									self.sender.send(response_message.unwrap()).await.unwrap();
								}
							}
							Err(err) => {
								error!("Protocol Error: {}", &err.to_string());
							}
						}
					}
					.instrument(request_message_span)
					.await;
				}
				Err(err) => {
					error!("Unexpected error receving request: {:?}", err);

					continue
				},
			}
		}

		if protocol_machine.is_active() {
			return Err(OperationCanceled);
		}

		Ok(())
	}
}
