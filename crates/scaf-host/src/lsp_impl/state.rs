use std::sync::Arc;

use scaf_abstractions::{fs::AnyEnumerableFileSystem, lsp_types::TraceValue};
use scaf_core::schema::TypeSchema;

use crate::{
	lsp::{
		analyzer::AnyAnalyzer,
		dialect::{AnalyzerFactory, ResolvedDialect},
		progress::ProgressManager,
		request::RequestManager,
		workspace::WorkspaceManager,
	},
	tracing::TraceValueAccessor,
};

/// Represents the active state of the scaf.
#[derive(Clone)]
pub(crate) struct State {
	/// The optional [`TraceValueAccessor`] that can be used to set the trace value used in the LSP tracing layer.
	trace_value: Option<TraceValueAccessor>,

	/// Parses and analyzes document contents on behalf of the [`WorkspaceManager`].
	pub analyzer: Arc<AnyAnalyzer>,

	/// Rebuilds [`State::analyzer`] for the selected dialect once a workspace schema is known.
	analyzer_factory: AnalyzerFactory,

	/// Whether the selected dialect exposes query-body LSP features (hover/completion/diagnostics
	/// inside a query). `false` once an unknown `--dialect` has fallen back to no query features.
	pub has_lsp_support: bool,

	/// The workspace schema loaded from `.scaf.yaml`, if any (spec.md §6). Set once, at `initialize`.
	pub schema: Option<Arc<TypeSchema>>,

	/// The file system used to enumerate and fetch the contents of files in opened workspaces.
	pub file_system: Arc<AnyEnumerableFileSystem>,

	/// The Language Server Protocol client's request manager.
	pub request_manager: RequestManager,

	/// Manages the set of opened workspaces. Only available once the client has reported its workspace folders
	/// as part of the `'initialize'` request.
	workspaces: Option<WorkspaceManager>,

	/// Reports indexing progress back to the LSP client. Only available once the client's capabilities are known.
	progress_manager: Option<ProgressManager>,
}

impl State {
	/// Initializes a new [`State`] instance for the given, already-resolved query dialect.
	pub fn new(
		trace_value: Option<TraceValueAccessor>,
		request_manager: RequestManager,
		file_system: Arc<AnyEnumerableFileSystem>,
		dialect: ResolvedDialect,
	) -> Self {
		let analyzer = (dialect.factory)(None);
		Self {
			trace_value,
			analyzer,
			analyzer_factory: dialect.factory,
			has_lsp_support: dialect.has_lsp_support,
			schema: None,
			file_system,
			request_manager,
			workspaces: None,
			progress_manager: None,
		}
	}

	/// Rebuilds [`State::analyzer`] for `schema`, e.g. once `.scaf.yaml` has been read from the
	/// first workspace folder at `initialize` time.
	pub fn set_schema(&mut self, schema: Option<Arc<TypeSchema>>) {
		self.analyzer = (self.analyzer_factory)(schema.clone());
		self.schema = schema;
	}

	/// Sets the [`TraceValue`] used by the LSP tracing layer, if a [`TraceValueAccessor`] is available.
	pub fn set_trace_value(&self, trace_value: TraceValue) {
		if let Some(accessor) = &self.trace_value {
			accessor.set(trace_value);
		}
	}

	/// Returns `true` if the [`State`] has been initialized with a [`WorkspaceManager`].
	pub fn has_workspaces(&self) -> bool { self.workspaces.is_some() }

	/// Returns the [`WorkspaceManager`].
	///
	/// Panics if called before [`State::set_workspaces`] (i.e., before the `'initialize'` request has been handled).
	pub fn workspaces(&self) -> &WorkspaceManager {
		self.workspaces.as_ref().expect("workspaces are only available once 'initialize' has been processed")
	}

	/// Sets the [`WorkspaceManager`] to be used for the remainder of the session.
	pub fn set_workspaces(&mut self, workspaces: WorkspaceManager) { self.workspaces = Some(workspaces); }

	/// Returns the [`ProgressManager`].
	///
	/// Panics if called before [`State::set_progress`] (i.e., before the `'initialize'` request has been handled).
	pub fn progress_manager(&self) -> &ProgressManager {
		self.progress_manager.as_ref().expect("the progress manager is only available once 'initialize' has been processed")
	}

	/// Sets the [`ProgressManager`] to be used for the remainder of the session.
	pub fn set_progress(&mut self, progress_manager: ProgressManager) { self.progress_manager = Some(progress_manager); }
}
