use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::path::{clean_path, encode_path};

const CHAPTER_MARKER: &str = "### [Chapter";

/// A file listed under a chapter heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub display_name: String,
    /// Path as written in the index, minus leading `./` or `/`
    pub raw_path: String,
    /// Path used for fetching (see `encode_path`)
    pub encoded_path: String,
}

impl FileRef {
    pub fn new(display_name: &str, path: &str) -> Self {
        FileRef {
            display_name: display_name.to_string(),
            raw_path: clean_path(path).to_string(),
            encoded_path: encode_path(path),
        }
    }

    /// Last path component, used for syntax detection
    pub fn file_name(&self) -> &str {
        self.raw_path.rsplit('/').next().unwrap_or(&self.raw_path)
    }
}

/// One table-of-contents entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    pub title: String,
    pub icon: String,
    pub files: Vec<FileRef>,
}

impl ChapterEntry {
    /// Text shown in the TOC and matched by the search filter
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.title)
    }
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^### \[Chapter \d+ - (.*?)\](?:\([^)\n]*\))?[ \t]*(.*)$").unwrap()
    })
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"- \[(.*?)\]\((.*?)\)").unwrap())
}

/// Split the document at every chapter heading. Text before the first heading is dropped.
fn chapter_segments(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = text.match_indices(CHAPTER_MARKER).map(|(i, _)| i).collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

/// Parse one segment. `None` when the heading has no title or no icon.
fn parse_segment(segment: &str) -> Option<ChapterEntry> {
    let heading = segment.lines().next()?;
    let caps = heading_re().captures(heading.trim_end_matches('\r'))?;
    let title = caps.get(1)?.as_str().to_string();
    let icon = caps.get(2)?.as_str().trim().to_string();
    if title.is_empty() || icon.is_empty() {
        return None;
    }

    let files = link_re()
        .captures_iter(segment)
        .map(|c| FileRef::new(&c[1], &c[2]))
        .collect();

    Some(ChapterEntry { title, icon, files })
}

/// Build the table of contents from the index markdown.
///
/// Chapters keep document order. A repeated title is dropped entirely;
/// its files are not merged into the first occurrence.
pub fn parse_index(text: &str) -> Vec<ChapterEntry> {
    let mut seen = HashSet::new();
    let mut chapters = Vec::new();

    for segment in chapter_segments(text) {
        let Some(chapter) = parse_segment(segment) else {
            tracing::debug!(heading = segment.lines().next().unwrap_or(""), "skipping malformed chapter");
            continue;
        };
        if !seen.insert(chapter.title.clone()) {
            tracing::debug!(title = %chapter.title, "skipping duplicate chapter");
            continue;
        }
        chapters.push(chapter);
    }

    chapters
}
