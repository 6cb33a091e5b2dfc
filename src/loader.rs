use std::collections::HashMap;
use std::fmt;

use crate::index::FileRef;
use crate::source::Fetcher;

/// Replace the five HTML-reserved characters with entities.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for ch in unsafe_text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Fetched file, kept in both forms: `raw` for copy/highlight, `escaped` for markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub raw: String,
    pub escaped: String,
}

impl FileContent {
    pub fn new(raw: String) -> Self {
        let escaped = escape_html(&raw);
        FileContent { raw, escaped }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Source answered with a non-success status
    Status { status: u16, path: String },
    /// Request never produced a response
    Transport { message: String, path: String },
}

impl LoadError {
    pub fn path(&self) -> &str {
        match self {
            LoadError::Status { path, .. } | LoadError::Transport { path, .. } => path,
        }
    }

    /// Lines shown in place of the file content
    pub fn lines(&self) -> Vec<String> {
        match self {
            LoadError::Status { status, path } => vec![
                format!("Error: Could not load file content. (Status: {})", status),
                format!("Attempted path: {}", path),
            ],
            LoadError::Transport { message, path } => vec![
                "Error: Could not load file content.".to_string(),
                message.clone(),
                format!("Attempted path: {}", path),
            ],
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(FileContent),
    Failed(LoadError),
}

/// Fetch a file once. No retry; failures come back as values.
pub fn load_file(fetcher: &dyn Fetcher, file: &FileRef) -> LoadOutcome {
    let path = file.encoded_path.clone();
    match fetcher.fetch(&path) {
        Ok(resp) if resp.is_success() => LoadOutcome::Loaded(FileContent::new(resp.body)),
        Ok(resp) => {
            tracing::warn!(path = %path, status = resp.status, "file fetch returned non-success status");
            LoadOutcome::Failed(LoadError::Status { status: resp.status, path })
        }
        Err(err) => {
            tracing::error!(path = %path, error = %format!("{:#}", err), "file fetch failed");
            LoadOutcome::Failed(LoadError::Transport {
                message: format!("{:#}", err),
                path,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Fetch in flight, tagged with its sequence number
    Loading(u64),
    Ready(LoadOutcome),
}

/// Per-file content cache keyed by encoded path.
/// An entry exists from the moment a fetch starts, so a file is fetched at most once.
#[derive(Debug, Default)]
pub struct ContentLoader {
    entries: HashMap<String, CacheEntry>,
    next_seq: u64,
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the fetch for `file`. Returns the sequence number the caller must fetch under,
    /// or `None` when the file is already cached or in flight.
    pub fn begin(&mut self, file: &FileRef) -> Option<u64> {
        if self.entries.contains_key(&file.encoded_path) {
            return None;
        }
        self.next_seq += 1;
        let seq = self.next_seq;
        self.entries
            .insert(file.encoded_path.clone(), CacheEntry::Loading(seq));
        Some(seq)
    }

    /// Store a finished fetch, whether or not anything still displays it.
    /// Results from a superseded fetch (invalidated or re-begun since) are dropped.
    /// Returns whether the outcome was stored.
    pub fn complete(&mut self, key: &str, seq: u64, outcome: LoadOutcome) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if *entry == CacheEntry::Loading(seq) => {
                *entry = CacheEntry::Ready(outcome);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, file: &FileRef) -> Option<&CacheEntry> {
        self.entries.get(&file.encoded_path)
    }

    /// Loaded content, if the file is cached successfully
    pub fn content(&self, file: &FileRef) -> Option<&FileContent> {
        match self.get(file) {
            Some(CacheEntry::Ready(LoadOutcome::Loaded(content))) => Some(content),
            _ => None,
        }
    }

    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
