use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::config::ActivityConfig;
use crate::github::{self, ActivityOutcome};
use crate::index::{self, ChapterEntry, FileRef};
use crate::loader::{self, LoadOutcome};
use crate::source::Fetcher;

/// Results delivered from background fetches to the UI thread
#[derive(Debug)]
pub enum LoadEvent {
    Index(Result<Vec<ChapterEntry>, String>),
    Activity(ActivityOutcome),
    /// `seq` is the cache sequence number the fetch was started under
    File { key: String, seq: u64, outcome: LoadOutcome },
}

/// Fetch and parse the index document. A failure only ever yields an empty TOC.
pub fn load_index(fetcher: &dyn Fetcher, index_path: &str) -> Result<Vec<ChapterEntry>, String> {
    let encoded = index::encode_path(index_path);
    match fetcher.fetch(&encoded) {
        Ok(resp) if resp.is_success() => Ok(index::parse_index(&resp.body)),
        Ok(resp) => Err(format!("{} returned status {}", encoded, resp.status)),
        Err(err) => Err(format!("{:#}", err)),
    }
}

pub fn spawn_index(fetcher: Arc<dyn Fetcher>, index_path: String, tx: Sender<LoadEvent>) {
    std::thread::spawn(move || {
        let result = load_index(fetcher.as_ref(), &index_path);
        let _ = tx.send(LoadEvent::Index(result));
    });
}

pub fn spawn_activity(config: ActivityConfig, slug: Option<String>, tx: Sender<LoadEvent>) {
    std::thread::spawn(move || {
        let outcome = match slug {
            Some(slug) => github::fetch_recent_commits(&config, &slug),
            None => ActivityOutcome::Failed("no repository configured".to_string()),
        };
        let _ = tx.send(LoadEvent::Activity(outcome));
    });
}

/// No cancellation: the result is delivered even if its panel was closed meanwhile.
pub fn spawn_file(fetcher: Arc<dyn Fetcher>, file: FileRef, seq: u64, tx: Sender<LoadEvent>) {
    std::thread::spawn(move || {
        let outcome = loader::load_file(fetcher.as_ref(), &file);
        let _ = tx.send(LoadEvent::File {
            key: file.encoded_path,
            seq,
            outcome,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LocalFetcher;

    #[test]
    fn load_index_from_local_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("README.md"),
            "### [Chapter 1 - Arrays] 📦\n- [sort.cpp](./arrays/sort.cpp)\n",
        )
        .unwrap();
        let chapters = load_index(&LocalFetcher::new(dir.path()), "README.md").unwrap();
        assert_eq!(chapters.len(), 1);
    }

    #[test]
    fn missing_index_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_index(&LocalFetcher::new(dir.path()), "README.md").unwrap_err();
        assert!(err.contains("404"));
    }

    #[test]
    fn spawned_file_job_reports_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.cpp"), "<x>").unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        spawn_file(Arc::new(LocalFetcher::new(dir.path())), FileRef::new("a", "./a.cpp"), 7, tx);
        match rx.recv().unwrap() {
            LoadEvent::File { key, seq, outcome: LoadOutcome::Loaded(c) } => {
                assert_eq!(key, "a.cpp");
                assert_eq!(seq, 7);
                assert_eq!(c.escaped, "&lt;x&gt;");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn activity_without_repo_fails() {
        let (tx, rx) = std::sync::mpsc::channel();
        spawn_activity(ActivityConfig::default(), None, tx);
        assert!(matches!(
            rx.recv().unwrap(),
            LoadEvent::Activity(ActivityOutcome::Failed(_))
        ));
    }
}
