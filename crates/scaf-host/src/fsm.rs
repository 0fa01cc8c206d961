use std::sync::{Arc, RwLock};

use async_rwlock::RwLock as AsyncRwLock;
use scaf_abstractions::fs::AnyEnumerableFileSystem;

use crate::{
	json_rpc::message::Message,
	lsp::{dialect::DialectRegistry, dispatch::Dispatch, request::RequestManager, state::LspServerState, LspProtocolError},
	lsp_impl::{active_initialized, active_uninitialized, initializing, shutting_down, state::State, stopped},
	tracing::TraceValueAccessor,
};

/// A type-erased [`Dispatch`] implementation for a given [`LspServerState`].
pub(crate) type LspServerStateDispatcher = Box<dyn Dispatch<State> + Send + Sync>;

/// Drives the Language Server Protocol's lifecycle: each [`LspServerState`] has its own [`LspServerStateDispatcher`],
/// built once up-front, and incoming messages are routed to whichever dispatcher matches the current state.
pub(crate) struct LspProtocolMachine {
	state: Arc<AsyncRwLock<State>>,
	current_state: Arc<RwLock<LspServerState>>,
	dispatchers: Vec<(LspServerState, LspServerStateDispatcher)>,
}

impl LspProtocolMachine {
	/// Initializes a new [`LspProtocolMachine`], starting in [`LspServerState::ActiveUninitialized`].
	///
	/// `dialect` names the query dialect to use for embedded query bodies (spec.md §4.J), resolved
	/// against the process-wide [`DialectRegistry`]; an unknown name logs a warning and falls back
	/// to no query features.
	pub fn new(
		trace_value: Option<TraceValueAccessor>,
		request_manager: RequestManager,
		file_system: Arc<AnyEnumerableFileSystem>,
		dialect: &str,
	) -> Self {
		let resolved_dialect = DialectRegistry::with_builtin_dialects().resolve(dialect);
		let state = State::new(trace_value, request_manager, file_system, resolved_dialect);

		Self {
			state: Arc::new(AsyncRwLock::new(state)),
			current_state: Arc::new(RwLock::new(LspServerState::ActiveUninitialized)),
			dispatchers: vec![
				(LspServerState::ActiveUninitialized, active_uninitialized::create_dispatcher()),
				(LspServerState::Initializing, initializing::create_dispatcher()),
				(LspServerState::ActiveInitialized, active_initialized::create_dispatcher()),
				(LspServerState::ShuttingDown, shutting_down::create_dispatcher()),
				(LspServerState::Stopped, stopped::create_dispatcher()),
			],
		}
	}

	/// Returns the current [`LspServerState`].
	pub fn current_state(&self) -> LspServerState { *self.current_state.read().unwrap() }

	/// Returns `true` unless the machine has transitioned to [`LspServerState::Stopped`].
	pub fn is_active(&self) -> bool { self.current_state() != LspServerState::Stopped }

	/// Processes a [`Message`] using the [`LspServerStateDispatcher`] for the current state, applying whatever
	/// state transition the dispatcher reports.
	pub async fn process_message(&mut self, message: Arc<Message>) -> Result<Option<Message>, LspProtocolError> {
		let current_state = self.current_state();

		let dispatcher = self
			.dispatchers
			.iter()
			.find(|(state, _)| *state == current_state)
			.map(|(_, dispatcher)| dispatcher)
			.expect("every LspServerState has a registered dispatcher");

		let (response, next_state) = dispatcher.dispatch(message, self.state.clone()).await?;

		*self.current_state.write().unwrap() = next_state;

		Ok(response)
	}
}
