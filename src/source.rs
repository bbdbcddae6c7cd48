//! Source resolution.
//!
//! An input is classified once at the boundary into a closed set of [`Source`]
//! variants, then resolved to a plain byte reader. The parser and the table
//! builder never inspect source kind.
//!
//! String inputs beginning with `http://` or `https://` are remote URLs;
//! every other string is a local path. Bytes are wrapped directly; open
//! handles are used as-is.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{TableError, TableResult};

/// Timeout applied to remote fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A classified input source. Constructed from the public entry call, consumed
/// once by [`Source::resolve`], not retained.
pub enum Source {
    /// A file on the local filesystem.
    LocalPath(PathBuf),
    /// A remote HTTP(S) endpoint.
    RemoteUrl {
        url: String,
        method: String,
        headers: Vec<(String, String)>,
    },
    /// Raw bytes already in memory.
    InMemory(Vec<u8>),
    /// An externally-supplied reader (open file handle, socket, ...).
    Reader(Box<dyn Read + Send>),
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::LocalPath(path) => f.debug_tuple("LocalPath").field(path).finish(),
            Source::RemoteUrl { url, method, .. } => f
                .debug_struct("RemoteUrl")
                .field("url", url)
                .field("method", method)
                .finish(),
            Source::InMemory(bytes) => f
                .debug_struct("InMemory")
                .field("len", &bytes.len())
                .finish(),
            Source::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl Source {
    /// Classify a string input as a remote URL or a local path.
    pub fn from_input(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Source::remote(input)
        } else {
            Source::LocalPath(PathBuf::from(input))
        }
    }

    /// A remote source fetched with GET and no extra headers.
    pub fn remote(url: impl Into<String>) -> Self {
        Source::RemoteUrl {
            url: url.into(),
            method: "GET".to_string(),
            headers: Vec::new(),
        }
    }

    /// An externally-supplied reader.
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Source::Reader(Box::new(reader))
    }

    /// Override the HTTP method. No-op on non-remote sources.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        if let Source::RemoteUrl { method: m, .. } = &mut self {
            *m = method.into();
        }
        self
    }

    /// Add a request header. No-op on non-remote sources.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Source::RemoteUrl { headers, .. } = &mut self {
            headers.push((name.into(), value.into()));
        }
        self
    }

    /// Human-readable description, used in observer context.
    pub fn describe(&self) -> String {
        match self {
            Source::LocalPath(path) => path.display().to_string(),
            Source::RemoteUrl { url, .. } => url.clone(),
            Source::InMemory(bytes) => format!("<memory:{} bytes>", bytes.len()),
            Source::Reader(_) => "<reader>".to_string(),
        }
    }

    /// Resolve to a byte reader, performing any I/O this source implies.
    ///
    /// - `LocalPath` opens the file; any open failure is surfaced as
    ///   [`TableError::NotFound`] with the OS-level message. A path that looks
    ///   like a URL under an unrecognized scheme is rejected with
    ///   [`TableError::Param`].
    /// - `RemoteUrl` issues the request and checks the status before handing
    ///   back the body.
    /// - `InMemory` and `Reader` involve no I/O.
    pub fn resolve(self) -> TableResult<Box<dyn Read + Send>> {
        match self {
            Source::LocalPath(path) => {
                let text = path.to_string_lossy();
                if text.contains("://") {
                    return Err(TableError::Param {
                        message: format!(
                            "input not supported; must be a path, URL, or recognized handle (got '{text}')"
                        ),
                    });
                }
                let file = File::open(&path).map_err(|source| TableError::NotFound {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(file))
            }
            Source::RemoteUrl {
                url,
                method,
                headers,
            } => fetch_remote(url, &method, &headers),
            Source::InMemory(bytes) => Ok(Box::new(std::io::Cursor::new(bytes))),
            Source::Reader(reader) => Ok(reader),
        }
    }
}

fn fetch_remote(
    url: String,
    method: &str,
    headers: &[(String, String)],
) -> TableResult<Box<dyn Read + Send>> {
    let method =
        reqwest::Method::from_bytes(method.as_bytes()).map_err(|_| TableError::Param {
            message: format!("invalid http method '{method}'"),
        })?;

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|source| TableError::Transport {
            url: url.clone(),
            source,
        })?;

    let mut request = client.request(method, &url);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request.send().map_err(|source| TableError::Transport {
        url: url.clone(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TableError::Http {
            status: status.as_u16(),
            url,
        });
    }
    Ok(Box::new(response))
}

impl From<&str> for Source {
    fn from(input: &str) -> Self {
        Source::from_input(input)
    }
}

impl From<String> for Source {
    fn from(input: String) -> Self {
        Source::from_input(&input)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::LocalPath(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::LocalPath(path)
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::InMemory(bytes)
    }
}

impl From<&[u8]> for Source {
    fn from(bytes: &[u8]) -> Self {
        Source::InMemory(bytes.to_vec())
    }
}

impl From<File> for Source {
    fn from(file: File) -> Self {
        Source::Reader(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::Source;

    #[test]
    fn string_inputs_classify_by_scheme() {
        assert!(matches!(
            Source::from_input("https://example.com/data.csv"),
            Source::RemoteUrl { .. }
        ));
        assert!(matches!(
            Source::from_input("data/input.csv"),
            Source::LocalPath(_)
        ));
    }

    #[test]
    fn unrecognized_scheme_is_rejected_at_resolution() {
        let err = Source::from_input("ftp://example.com/data.csv")
            .resolve()
            .err()
            .unwrap();
        assert!(err.to_string().contains("input not supported"));
    }
}
