mod cli;
mod commands;
mod driver;

use scaf_abstractions::{
	event_listener::Event,
	futures_extensions::async_extensions::AsyncPool,
	tracing::{subscriber, Level, Subscriber},
};
use scaf_host::tracing::tracing_subscriber::{
	fmt::{layer, writer::MakeWriterExt},
	prelude::__tracing_subscriber_SubscriberExt,
	registry::LookupSpan,
	Layer, Registry,
};
use cancellation::CancellationTokenSource;
use cli::flags::{Scaf, ScafCmd};
use commands::{lsp_server::LspServerCommand, Command, CommandInvocationError};
use std::{
	env::current_exe,
	process,
	sync::{
		atomic::{AtomicU8, Ordering},
		Arc,
	},
};
use tracing_appender::{
	non_blocking::WorkerGuard,
	rolling::{RollingFileAppender, Rotation},
};

/// Entry point for the scaf.
#[tokio::main]
pub async fn main() {
	match Scaf::from_env() {
		Ok(cmd) => {
			let default_logging_layer = create_default_logging_layer::<Registry>(&cmd);
			let mut layers = if let Some((layer, _)) = default_logging_layer { vec![layer] } else { vec![] };
			let dialect = cmd.dialect.clone().unwrap_or_else(|| "cypher".to_string());
			let cmd = match cmd.subcommand {
				ScafCmd::Server(config) => RunnableCommand(LspServerCommand::new(dialect, config)),
				_ => unreachable!(),
			};

			layers.append(&mut cmd.logging_layers());

			let subscriber = Registry::default().with(layers);

			subscriber::set_global_default(subscriber).expect("Unable to set global tracing subscriber.");

			cmd.run().await;
		}
		Err(err) => {
			println!();
			println!("{}", err);
			println!();
		}
	}
}

/// Retrieves the default logging layer based on the presence of the '`--logfile`' CLI argument.
fn create_default_logging_layer<S>(cmd: &Scaf) -> Option<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard)>
where
	S: Subscriber,
	for<'a> S: LookupSpan<'a>,
{
	let logfile = cmd.logfile.as_ref()?;
	let loglevel = if cmd.debug || cmd.trace { Level::DEBUG } else { Level::INFO };

	let dir = logfile.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
	let file_name =
		logfile.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_else(|| format!("{}.log", get_logfile_stem()));

	let file_writer = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
	let (non_blocking, guard) = tracing_appender::non_blocking(file_writer);
	let layer = layer().with_writer(non_blocking.with_max_level(loglevel)).boxed();

	Some((layer, guard))
}

/// Returns a log filename stem (a filename without an extension).
#[inline]
fn get_logfile_stem() -> String {
	let default_name: String = String::from("scaf");
	let executable_name = current_exe()
		.ok()
		.and_then(|path_buffer| path_buffer.file_stem().map(|s| s.to_os_string()).and_then(|s| s.into_string().ok()));

	executable_name.unwrap_or(default_name)
}

/// Adapts a [`Command`] and makes it runnable.
///
/// Since [`Command`] instances are runnable with a [`CancellationToken`], a [`RunnableCommand`] will cancel its underlying
/// command when receiving a 'Ctrl-C' signal.
struct RunnableCommand<C: Command>(C);

impl<C: Command> RunnableCommand<C> {
	/// Executes the adapted command.
	///
	/// The supplied command will be invoked with a [`CancellationToken`] that is canceled upon receiving a 'Ctrl-C' signal (if
	/// it is supported by the platform).
	async fn run(&self) {
		let Self(cmd) = self;

		let count = Arc::new(AtomicU8::new(0));

		let cancellation_source = CancellationTokenSource::new();
		let cancellation_token = cancellation_source.token().clone();

		ctrlc::set_handler(move || {
			let prev_count = count.fetch_add(1, Ordering::Relaxed);

			if prev_count == 0 {
				eprintln!();
				eprintln!("(To forcibly exit, press 'Ctrl+C' again)");

				cancellation_source.cancel();
			}

			if prev_count > 0 {
				process::exit(-1);
			}
		})
		.expect("'Ctrl-C' handling is not available for this platform.");

		match cmd.run(cancellation_token).await {
			Ok(_) => {}
			Err(err) => match err {
				CommandInvocationError::Cancelled => println!("{}", err),
				_ => eprintln!("{}", err),
			},
		};
	}

	/// Retrieves any additional logging layers that have been configured by the underlying command.
	fn logging_layers(&self) -> Vec<Box<dyn Layer<Registry> + Send + Sync + 'static>> {
		let Self(cmd) = self;

		cmd.logging_layers::<Registry>()
	}
}

// Unit test fixtures.
#[cfg(test)]
mod tests;
