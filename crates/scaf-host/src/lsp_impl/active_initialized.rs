use async_rwlock::RwLock as AsyncRwLock;
use std::sync::Arc;

use scaf_abstractions::{
	lsp_types::{
		notification::{
			DidChangeTextDocument, DidChangeWatchedFiles, DidCloseTextDocument, DidOpenTextDocument,
			DidSaveTextDocument, Exit, PublishDiagnostics, SetTrace,
		},
		request::{Completion, GotoDefinition, HoverRequest, Shutdown},
		CompletionItem, CompletionItemKind, CompletionList, CompletionParams, CompletionResponse, Diagnostic as LspDiagnostic,
		DiagnosticSeverity, DidChangeTextDocumentParams, DidChangeWatchedFilesParams, DidCloseTextDocumentParams,
		DidOpenTextDocumentParams, DidSaveTextDocumentParams, GotoDefinitionParams, GotoDefinitionResponse, Hover,
		HoverContents, HoverParams, Location, MarkupContent, MarkupKind, SetTraceParams, Url,
	},
	tracing::{error, info},
};

use crate::{
	fsm::LspServerStateDispatcher,
	lsp::{
		dispatch::Dispatch,
		dispatch_target::{HandlerError, HandlerResult},
		state::LspServerState,
		DispatchBuilder,
	},
};

use super::state::State;
use crate::lsp::analyzer::ParsedUnit;
use scaf_core::{base_abstractions::Severity, dispatch::PositionContext};

/// Builds and then returns a dispatcher handling the [`LspServerState::ActiveInitialized`] state.
pub(crate) fn create_dispatcher() -> LspServerStateDispatcher {
	Box::new(
		DispatchBuilder::<State>::new(LspServerState::ActiveInitialized)
			.for_request_with_options::<Shutdown, _>(on_shutdown, |mut options| {
				options.transition_to(LspServerState::ShuttingDown)
			})
			.for_request::<HoverRequest, _>(on_text_document_hover)
			.for_request::<Completion, _>(on_text_document_completion)
			.for_request::<GotoDefinition, _>(on_goto_definition)
			.for_notification::<DidChangeTextDocument, _>(on_text_document_did_change)
			.for_notification::<DidCloseTextDocument, _>(on_text_document_did_close)
			.for_notification::<DidOpenTextDocument, _>(on_text_document_did_open)
			.for_notification::<DidSaveTextDocument, _>(on_text_document_did_save)
			.for_notification::<SetTrace, _>(on_set_trace)
			.for_notification::<DidChangeWatchedFiles, _>(on_watched_file_change)
			.for_notification_with_options::<Exit, _>(on_exit, |mut options| {
				options.transition_to(LspServerState::Stopped)
			})
			.build(),
	)
}

async fn on_shutdown(_: LspServerState, _: (), _: Arc<AsyncRwLock<State>>) -> HandlerResult<()> { Ok(()) }

/// Builds a [`scaf_core::cypher::lsp::QueryLSPContext`] for the function named `enclosing_function`,
/// looking up its declared parameters from the unit's symbol table.
fn query_lsp_context<'a>(
	unit: &ParsedUnit,
	enclosing_function: Option<&str>,
	schema: Option<&'a scaf_core::schema::TypeSchema>,
	trigger_character: Option<char>,
) -> scaf_core::cypher::lsp::QueryLSPContext<'a> {
	let declared_params = enclosing_function
		.and_then(|name| unit.analyzed.symbols.queries.get(name))
		.map(|symbol| symbol.params.clone())
		.unwrap_or_default();

	scaf_core::cypher::lsp::QueryLSPContext {
		enclosing_function_name: enclosing_function.map(str::to_string),
		declared_params,
		file_path: unit.document_identifier.uri.to_string(),
		schema,
		trigger_character,
	}
}

async fn on_text_document_hover(
	_: LspServerState,
	params: HoverParams,
	state: Arc<AsyncRwLock<State>>,
) -> HandlerResult<Option<Hover>> {
	let state = state.read().await;
	let uri = params.text_document_position_params.text_document.uri;
	let file = state.workspaces().get_file(uri.clone());

	let unit = file.get_parsed_unit().await.map_err(|_| HandlerError::new("File not found"))?;

	let source = unit.lsp_file.get_file_content();
	let offset = unit.lsp_file.lsp_to_byte(&params.text_document_position_params.position);
	let context = scaf_core::dispatch::classify(&unit.analyzed.ast, source, offset);

	let hover = match context {
		PositionContext::InQueryBody { body, offset, enclosing_function, body_start_position, .. }
			if state.has_lsp_support =>
		{
			let schema = state.schema.clone();
			let meta = match &schema {
				Some(schema) => scaf_core::cypher::analyze_with_schema(&body, schema),
				None => scaf_core::cypher::analyze(&body),
			};
			let ctx = query_lsp_context(&unit, enclosing_function.as_deref(), schema.as_deref(), None);

			scaf_core::cypher::lsp::hover(&body, &meta, offset, &ctx).map(|h| Hover {
				range: Some(unit.lsp_file.byte_range_to_lsp_range(&scaf_core::base_abstractions::Span {
					start: scaf_core::dispatch::body_offset_to_doc_offset(body_start_position, &body, h.span.start),
					end: scaf_core::dispatch::body_offset_to_doc_offset(body_start_position, &body, h.span.end),
				})),
				contents: HoverContents::Markup(MarkupContent { kind: MarkupKind::Markdown, value: h.contents }),
			})
		}
		PositionContext::InQueryBody { .. } => None,
		PositionContext::InDSL { dotted_prefix, .. } => {
			unit.analyzed.symbols.queries.get(&dotted_prefix).map(|symbol| Hover {
				range: None,
				contents: HoverContents::Markup(MarkupContent {
					kind: MarkupKind::Markdown,
					value: format!("**{}**({})", symbol.name, symbol.params.join(", ")),
				}),
			})
		}
		PositionContext::InExpression { .. } => None,
	};

	Ok(hover)
}

async fn on_goto_definition(
	_: LspServerState,
	params: GotoDefinitionParams,
	state: Arc<AsyncRwLock<State>>,
) -> HandlerResult<Option<GotoDefinitionResponse>> {
	let state = state.read().await;
	let uri = params.text_document_position_params.text_document.uri;
	let file = state.workspaces().get_file(uri.clone());

	let unit = file.get_parsed_unit().await.map_err(|_| HandlerError::new("File not found"))?;

	let source = unit.lsp_file.get_file_content();
	let offset = unit.lsp_file.lsp_to_byte(&params.text_document_position_params.position);
	let context = scaf_core::dispatch::classify(&unit.analyzed.ast, source, offset);

	let dotted_prefix = match context {
		PositionContext::InDSL { dotted_prefix, .. } => dotted_prefix,
		_ => return Ok(None),
	};

	let Some(symbol) = unit.analyzed.symbols.queries.get(&dotted_prefix) else { return Ok(None) };
	let Some(function) = unit.analyzed.ast.functions.get(symbol.declaring_node_ref) else { return Ok(None) };

	let range = unit.lsp_file.byte_range_to_lsp_range(&function.name_span);

	Ok(Some(GotoDefinitionResponse::Scalar(Location::new(uri, range))))
}

async fn on_text_document_completion(
	_: LspServerState,
	params: CompletionParams,
	state: Arc<AsyncRwLock<State>>,
) -> HandlerResult<Option<CompletionResponse>> {
	let state = state.read().await;
	let uri = params.text_document_position.text_document.uri;
	let file = state.workspaces().get_file(uri.clone());

	match file.get_parsed_unit().await {
		Ok(unit) => {
			let source = unit.lsp_file.get_file_content();
			let offset = unit.lsp_file.lsp_to_byte(&params.text_document_position.position);
			let trigger_character = params
				.context
				.as_ref()
				.and_then(|ctx| ctx.trigger_character.as_ref())
				.and_then(|s| s.chars().next());
			let context = scaf_core::dispatch::classify(&unit.analyzed.ast, source, offset);

			let items = match context {
				PositionContext::InQueryBody { body, offset, enclosing_function, .. } if state.has_lsp_support => {
					let schema = state.schema.clone();
					let meta = match &schema {
						Some(schema) => scaf_core::cypher::analyze_with_schema(&body, schema),
						None => scaf_core::cypher::analyze(&body),
					};
					let ctx = query_lsp_context(&unit, enclosing_function.as_deref(), schema.as_deref(), trigger_character);

					scaf_core::cypher::lsp::complete(&body, &meta, offset, &ctx)
						.into_iter()
						.map(|c| CompletionItem {
							label: c.label,
							detail: c.detail,
							insert_text: Some(c.insert_text),
							kind: Some(match c.kind {
								scaf_core::cypher::lsp::CompletionKind::Keyword => CompletionItemKind::KEYWORD,
								scaf_core::cypher::lsp::CompletionKind::Function => CompletionItemKind::FUNCTION,
								scaf_core::cypher::lsp::CompletionKind::Label => CompletionItemKind::CLASS,
								scaf_core::cypher::lsp::CompletionKind::RelationshipType => CompletionItemKind::ENUM,
								scaf_core::cypher::lsp::CompletionKind::Property => CompletionItemKind::FIELD,
								scaf_core::cypher::lsp::CompletionKind::Parameter => CompletionItemKind::VARIABLE,
								scaf_core::cypher::lsp::CompletionKind::Variable => CompletionItemKind::VARIABLE,
							}),
							..Default::default()
						})
						.collect()
				}
				PositionContext::InQueryBody { .. } | PositionContext::InDSL { .. } | PositionContext::InExpression { .. } => unit
					.analyzed
					.symbols
					.queries
					.keys()
					.map(|name| CompletionItem { label: name.clone(), kind: Some(CompletionItemKind::FUNCTION), ..Default::default() })
					.collect(),
			};

			Ok(Some(CompletionResponse::List(CompletionList { is_incomplete: false, items })))
		}
		Err(err) => {
			error!(file_uri = uri.as_str(), "Could not query completions. Index error: {}", err);

			Err(HandlerError::new("Could not query completions for document."))
		}
	}
}

async fn on_text_document_did_open(
	_: LspServerState,
	params: DidOpenTextDocumentParams,
	state: Arc<AsyncRwLock<State>>,
) -> HandlerResult<()> {
	let diagnostics = {
		let state = state.write().await;
		let file = state.workspaces().get_file(params.text_document.uri.clone());

		let document_identifier =
			scaf_abstractions::lsp_types::TextDocumentIdentifier { uri: params.text_document.uri.clone() };
		let unit = state.analyzer.parse_text_document_contents(document_identifier, params.text_document.text.clone());
		let diagnostics = process_diagnostics(&unit, state.schema.as_deref(), state.has_lsp_support);

		file.open_or_update(unit);
		diagnostics
	};

	publish(&state, params.text_document.uri, diagnostics).await
}

async fn on_text_document_did_change(
	_: LspServerState,
	params: DidChangeTextDocumentParams,
	state: Arc<AsyncRwLock<State>>,
) -> HandlerResult<()> {
	let diagnostics = {
		let state = state.write().await;
		let file = state.workspaces().get_file(params.text_document.uri.clone());

		let mut current = file.get_parsed_unit().await.map_err(|_| {
			HandlerError::new_with_data("received a didChange notification for an unknown file", Some(params.text_document.uri.as_str()))
		})?;

		let mut lsp_file = (*current.lsp_file).clone();
		for change in params.content_changes {
			lsp_file.lazy_add(&change);
		}

		let text = lsp_file.get_file_content().clone();
		current = state.analyzer.parse_text_document_contents(
			scaf_abstractions::lsp_types::TextDocumentIdentifier { uri: params.text_document.uri.clone() },
			text,
		);

		let diagnostics = process_diagnostics(&current, state.schema.as_deref(), state.has_lsp_support);
		file.open_or_update(current);
		diagnostics
	};

	publish(&state, params.text_document.uri, diagnostics).await
}

async fn on_text_document_did_close(
	_: LspServerState,
	params: DidCloseTextDocumentParams,
	state: Arc<AsyncRwLock<State>>,
) -> HandlerResult<()> {
	let state = state.write().await;
	let file = state.workspaces().get_file(params.text_document.uri.clone());

	file.close();

	Ok(())
}

async fn on_text_document_did_save(
	_: LspServerState,
	params: DidSaveTextDocumentParams,
	state: Arc<AsyncRwLock<State>>,
) -> HandlerResult<()> {
	if let Some(text) = params.text {
		let diagnostics = {
			let state = state.write().await;
			let file = state.workspaces().get_file(params.text_document.uri.clone());

			info!("Syncing buffer on save.");

			let unit = state.analyzer.parse_text_document_contents(
				scaf_abstractions::lsp_types::TextDocumentIdentifier { uri: params.text_document.uri.clone() },
				text,
			);
			let diagnostics = process_diagnostics(&unit, state.schema.as_deref(), state.has_lsp_support);
			file.open_or_update(unit);
			diagnostics
		};

		publish(&state, params.text_document.uri, diagnostics).await?;
	}

	Ok(())
}

async fn on_set_trace(_: LspServerState, params: SetTraceParams, state: Arc<AsyncRwLock<State>>) -> HandlerResult<()> {
	let state = state.read().await;

	state.set_trace_value(params.value);

	Ok(())
}

async fn on_watched_file_change(
	_: LspServerState,
	params: DidChangeWatchedFilesParams,
	_: Arc<AsyncRwLock<State>>,
) -> HandlerResult<()> {
	let file_changes: Vec<String> = params
		.changes
		.into_iter()
		.map(|file_event| format!("({:?} {})", file_event.typ, file_event.uri))
		.collect();

	info!(file_changes = file_changes.join(", "), "Watched file changes.");

	Ok(())
}

/// Responds to an 'exit' notification from the LSP client.
async fn on_exit(_: LspServerState, _: (), _: Arc<AsyncRwLock<State>>) -> HandlerResult<()> { Ok(()) }

async fn publish(state: &Arc<AsyncRwLock<State>>, uri: Url, diagnostics: Vec<LspDiagnostic>) -> HandlerResult<()> {
	state
		.read()
		.await
		.request_manager
		.send_notification::<PublishDiagnostics>(scaf_abstractions::lsp_types::PublishDiagnosticsParams {
			uri,
			diagnostics,
			version: None,
		})
		.await
		.map_err(|err| HandlerError::new_with_data("Could not send diagnostics", Some(err.to_string())))?;

	Ok(())
}

/// Combines the file-level diagnostics (parse/symbol/semantic) with each query's own Cypher
/// diagnostics, mapping query-body-relative spans back to document coordinates (spec.md §4.F).
///
/// Per-query diagnostics are skipped entirely when the selected dialect has no LSP support
/// (spec.md §4.J): an unrecognized `--dialect` means query bodies are never analyzed.
fn process_diagnostics(
	unit: &ParsedUnit,
	schema: Option<&scaf_core::schema::TypeSchema>,
	has_lsp_support: bool,
) -> Vec<LspDiagnostic> {
	let mut diagnostics: Vec<scaf_core::base_abstractions::Diagnostic> = unit.analyzed.diagnostics.clone();

	if has_lsp_support {
		for function in &unit.analyzed.ast.functions {
			let body_start_position = function.body_start + 1;
			let meta = match schema {
				Some(schema) => scaf_core::cypher::analyze_with_schema(&function.body_raw_string, schema),
				None => scaf_core::cypher::analyze(&function.body_raw_string),
			};

			for diagnostic in meta.diagnostics {
				let span = scaf_core::dispatch::body_offset_to_doc_offset(body_start_position, &function.body_raw_string, diagnostic.span.start)
					..scaf_core::dispatch::body_offset_to_doc_offset(body_start_position, &function.body_raw_string, diagnostic.span.end);

				diagnostics.push(scaf_core::base_abstractions::Diagnostic { span, ..diagnostic });
			}
		}
	}

	diagnostics
		.into_iter()
		.map(|d| LspDiagnostic {
			range: unit.lsp_file.byte_range_to_lsp_range(&d.span),
			severity: Some(match d.severity {
				Severity::Info => DiagnosticSeverity::INFORMATION,
				Severity::Hint => DiagnosticSeverity::HINT,
				Severity::Warning => DiagnosticSeverity::WARNING,
				Severity::Error => DiagnosticSeverity::ERROR,
			}),
			code: Some(scaf_abstractions::lsp_types::NumberOrString::String(d.kind.code().to_string())),
			message: d.message,
			..Default::default()
		})
		.collect()
}
