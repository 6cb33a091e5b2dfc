use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::index::decode_path;

/// Raw response from a source: HTTP-like status plus the body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        FetchResponse { status: 200, body: body.into() }
    }

    pub fn status(status: u16) -> Self {
        FetchResponse { status, body: String::new() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetch text by encoded path relative to the notes root.
///
/// `Err` is reserved for transport failures; a missing file is a 404 response.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, encoded_path: &str) -> Result<FetchResponse>;

    /// Human-readable location of the notes root
    fn describe(&self) -> String;

    /// Local root directory, if this source lives on disk
    fn local_root(&self) -> Option<&Path> {
        None
    }
}

// ── Local directory ──

pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFetcher { root: root.into() }
    }
}

/// True when the relative path cannot climb out of the root
fn stays_inside(rel: &Path) -> bool {
    rel.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl Fetcher for LocalFetcher {
    fn fetch(&self, encoded_path: &str) -> Result<FetchResponse> {
        let decoded = decode_path(encoded_path);
        let rel = Path::new(&decoded);
        if !stays_inside(rel) {
            return Ok(FetchResponse::status(403));
        }
        let full = self.root.join(rel);
        match std::fs::read(&full) {
            Ok(bytes) => Ok(FetchResponse::ok(String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse::status(404)),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Ok(FetchResponse::status(403))
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", full.display())),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn local_root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

// ── HTTP ──

pub struct HttpFetcher {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("nb/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build reqwest client")?;
        Ok(HttpFetcher {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, encoded_path: &str) -> String {
        format!("{}/{}", self.base_url, encoded_path.trim_start_matches('/'))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, encoded_path: &str) -> Result<FetchResponse> {
        let url = self.url(encoded_path);
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {}", url))?;
        let status = resp.status().as_u16();
        let body = resp.text().with_context(|| format!("read body of {}", url))?;
        Ok(FetchResponse { status, body })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Pick the fetcher for a CLI source argument: a base URL or a directory.
pub fn open_source(source: &str) -> Result<Box<dyn Fetcher>> {
    if is_remote(source) {
        return Ok(Box::new(HttpFetcher::new(source)?));
    }
    let root = std::fs::canonicalize(source)
        .with_context(|| format!("Path not found: {}", source))?;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }
    Ok(Box::new(LocalFetcher::new(root)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_reads_decoded_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Control Flow")).unwrap();
        std::fs::write(dir.path().join("Control Flow/a+b.cpp"), "int main() {}").unwrap();

        let fetcher = LocalFetcher::new(dir.path());
        let resp = fetcher.fetch("Control%20Flow/a%2Bb.cpp").unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.body, "int main() {}");
    }

    #[test]
    fn local_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = LocalFetcher::new(dir.path());
        let resp = fetcher.fetch("nope.cpp").unwrap();
        assert_eq!(resp.status, 404);
        assert!(!resp.is_success());
    }

    #[test]
    fn local_rejects_parent_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = LocalFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("../etc/passwd").unwrap().status, 403);
    }

    #[test]
    fn local_exposes_root() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = LocalFetcher::new(dir.path());
        assert_eq!(fetcher.local_root(), Some(dir.path()));
    }

    #[test]
    fn http_url_joins_without_double_slash() {
        let f = HttpFetcher::new("https://example.com/notes/").unwrap();
        assert_eq!(f.url("README.md"), "https://example.com/notes/README.md");
        assert_eq!(f.url("/a%20b.cpp"), "https://example.com/notes/a%20b.cpp");
        assert!(f.local_root().is_none());
    }

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://x.io"));
        assert!(is_remote("http://x.io"));
        assert!(!is_remote("./notes"));
    }

    #[test]
    fn open_source_rejects_missing_dir() {
        assert!(open_source("/definitely/not/here/nb").is_err());
    }

    #[test]
    fn status_classification() {
        assert!(FetchResponse::status(204).is_success());
        assert!(!FetchResponse::status(301).is_success());
        assert!(!FetchResponse::status(500).is_success());
    }
}
