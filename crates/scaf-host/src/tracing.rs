pub use tracing_subscriber;

use crate::{
	json_rpc::message::{Message, Notification},
	MessageChannel
};
use scaf_abstractions::{
	futures_extensions::async_extensions::AsyncPool,
	lsp_types::{LogMessageParams, MessageType, TraceValue},
	tracing::{field::Field, Event, Level, Subscriber}
};
use async_channel::{Receiver, Sender};
use core::fmt::Debug;
use std::{
	fmt::{Display, Write},
	sync::{Arc, Mutex}
};
use tracing_subscriber::{field::Visit, layer::Context, Layer};

/// Default capacity of the bounded queue between tracing events and the client-facing consumer
/// task (spec.md §4.I).
const LOG_SINK_CAPACITY: usize = 100;

/// Allows the [`TraceValue`] to be set for a [`LspTracingLayer`].
///
/// Since `'Tracing'` logging levels have to be owned by subscribers, a [`TraceValueAccessor`] can be retrieved and then
/// later used to change the [`TraceValue`] used in order to determine how the received trace events should be processed
/// on behalf of the Language Server Protocol ('LSP') client.
#[derive(Clone)]

pub struct TraceValueAccessor(Arc<Mutex<TraceValue>>);

impl TraceValueAccessor {
	/// Sets the [`TraceValue`] on the associated [`LspTracingLayer`].

	pub fn set(&self, new_trace_value: TraceValue) {

		let TraceValueAccessor(trace_value) = self;

		let mut trace_value = trace_value.lock().unwrap();

		*trace_value = new_trace_value;
	}
}

/// A `'Tracing'` logging layer that forwards events to a Language Server Protocol ('LSP') client as
/// `window/logMessage` notifications (spec.md §4.I).
///
/// Producers (`on_event`, called from whatever thread emitted the tracing event) never block: a
/// bounded queue sits between them and the single consumer task that owns the client's message
/// channel, and a full queue drops the new entry rather than stall the caller.
pub struct LspTracingLayer {
	sink: Sender<Message>,
	trace_value: Arc<Mutex<TraceValue>>
}

impl LspTracingLayer {
	/// Initializes a new [`LspTracingLayer`] that will forward log messages to a given [`MessageChannel`].
	pub fn new(request_channel: MessageChannel) -> Self {
		let (client_sender, _) = request_channel;
		let (sink, receiver) = async_channel::bounded::<Message>(LOG_SINK_CAPACITY);

		AsyncPool::spawn_work(forward_log_messages(receiver, client_sender));

		Self { sink, trace_value: Arc::new(Mutex::new(TraceValue::Off)) }
	}

	pub fn trace_value(&self) -> TraceValueAccessor { TraceValueAccessor(self.trace_value.clone()) }
}

impl<S> Layer<S> for LspTracingLayer
where
	S: Subscriber
{
	fn on_event(&self, event: &Event, _ctx: Context<S>) {
		let trace_value = *self.trace_value.lock().unwrap();

		let mut visitor = LspTraceMessageVisitor::new();

		event.record(&mut visitor);

		let message = if trace_value == TraceValue::Verbose { format!("{}", visitor) } else { visitor.message };

		let notification = Notification::new(
			"window/logMessage",
			LogMessageParams { typ: message_type_for(event.metadata().level()), message }
		);

		// Non-blocking, drop-on-overflow: a full queue means the consumer is behind, and a log
		// message is not worth stalling whatever thread is emitting it.
		self.sink.try_send(Message::Notification(notification)).ok();
	}
}

/// The single consumer task draining the bounded sink and forwarding each entry to the client.
async fn forward_log_messages(receiver: Receiver<Message>, client_sender: Sender<Message>) {
	while let Ok(message) = receiver.recv().await {
		if client_sender.send(message).await.is_err() {
			break; // The client channel closed; nothing left to forward to.
		}
	}
}

fn message_type_for(level: &Level) -> MessageType {
	match *level {
		Level::ERROR => MessageType::ERROR,
		Level::WARN => MessageType::WARNING,
		Level::INFO => MessageType::INFO,
		Level::DEBUG | Level::TRACE => MessageType::LOG
	}
}

/// Provides a [`Visit`] implementation that allows trace events to be formatted for a message channel attached to a Language
/// Server Client.

struct LspTraceMessageVisitor {
	message: String,
	formatted_fields: String
}

impl LspTraceMessageVisitor {
	fn new() -> Self { Self { message: String::new(), formatted_fields: String::new() } }
}

impl Display for LspTraceMessageVisitor {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {

		if !self.formatted_fields.is_empty() {

			write!(f, "{} [{}]", self.message, self.formatted_fields)?;

			return Ok(());
		}

		write!(f, "{}", self.message)?;

		Ok(())
	}
}

impl Visit for LspTraceMessageVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn Debug) {

		if field.name() == "message" {

			write!(self.message, "{:?}", value).unwrap();

			return;
		}

		write!(self.formatted_fields, "{}={:?},", field.name(), value).unwrap();
	}
}
