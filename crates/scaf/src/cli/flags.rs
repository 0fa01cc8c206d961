use std::path::PathBuf;

xflags::xflags! {
	src "./src/cli/flags.rs"

	/// A Language Server Protocol (LSP) implementation for a testing DSL that embeds Cypher graph
	/// queries.
	cmd scaf {
		/// Query dialect to use for embedded query bodies. Defaults to 'cypher'.
		optional --dialect name: String

		/// Log at debug level.
		optional --debug

		/// Enable trace-level logging. Synonymous with --debug today; reserved for finer-grained
		/// tracing in the future.
		optional --trace

		/// Optional file to additionally write logs to.
		optional --logfile path: PathBuf

		///  Displays the version number.
		optional -v,--version

		/// Starts executing the LSP server (default command).
		default cmd server {
			/// Use the 'stdio' transport (default).
			optional --stdio
		}
	}
}
// generated start
// The following code is generated by `xflags` macro.
// Run `env UPDATE_XFLAGS=1 cargo build` to regenerate.
#[derive(Debug)]
pub struct Scaf {
    pub dialect: Option<String>,
    pub debug: bool,
    pub trace: bool,
    pub logfile: Option<PathBuf>,
    pub version: bool,
    pub subcommand: ScafCmd,
}

#[derive(Debug)]
pub enum ScafCmd {
    Server(Server),
}

#[derive(Debug)]
pub struct Server {
    pub stdio: bool,
}

impl Scaf {
    #[allow(dead_code)]
    pub fn from_env_or_exit() -> Self {
        Self::from_env_or_exit_()
    }

    #[allow(dead_code)]
    pub fn from_env() -> xflags::Result<Self> {
        Self::from_env_()
    }

    #[allow(dead_code)]
    pub fn from_vec(args: Vec<std::ffi::OsString>) -> xflags::Result<Self> {
        Self::from_vec_(args)
    }
}
// generated end
