use lsp_types::{TextDocumentIdentifier, Url};

use crate::BoxFuture;

/// Enumerates and fetches the contents of files in a workspace folder.
///
/// Implemented as plain `BoxFuture`-returning methods (rather than `#[async_trait]`) so that
/// [`AnyEnumerableFileSystem`] trait objects can be built and stored without boxing twice.
pub trait EnumerableFileSystem {
	/// Enumerates the files below `folder_uri` whose relative path matches `file_pattern` (a glob).
	fn enumerate_folder<'a>(&'a self, folder_uri: Url, file_pattern: String) -> BoxFuture<'a, Vec<TextDocumentIdentifier>>;

	/// Fetches the current contents of `file_uri`, or `None` if it could not be read.
	fn file_contents<'a>(&'a self, file_uri: Url) -> BoxFuture<'a, Option<String>>;
}

pub type AnyEnumerableFileSystem = Box<dyn EnumerableFileSystem + Send + Sync>;
