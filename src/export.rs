//! Static single-page HTML snapshot of the notes.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::config::NbConfig;
use crate::github::{self, ActivityOutcome};
use crate::index::ChapterEntry;
use crate::loader::{self, CacheEntry, ContentLoader, LoadOutcome};
use crate::source::Fetcher;

use crate::loader::escape_html as esc;

/// Anchor id for a chapter section
fn chapter_anchor(idx: usize) -> String {
    format!("chapter-{}", idx + 1)
}

fn render_activity(out: &mut String, outcome: &ActivityOutcome) {
    out.push_str("<section class=\"recent-changes\">\n<h2>Recent Updates</h2>\n");
    match outcome {
        ActivityOutcome::Commits(commits) => {
            for c in commits {
                let _ = write!(
                    out,
                    "<div class=\"change-item\"><div class=\"change-header\">\
                     <span class=\"change-date\">{}</span> \
                     <span class=\"change-author\">{}</span></div>\
                     <p class=\"change-message\">{}</p>\
                     <a href=\"{}\" class=\"change-link\">View changes</a></div>\n",
                    esc(&c.display_date()),
                    esc(&c.author_name),
                    esc(&c.message),
                    esc(&c.html_url),
                );
            }
        }
        ActivityOutcome::Empty => {
            let _ = writeln!(out, "<p class=\"no-changes\">{}</p>", github::NO_CHANGES_MESSAGE);
        }
        ActivityOutcome::Failed(_) => {
            let _ = writeln!(out, "<p class=\"error-message\">{}</p>", github::ERROR_MESSAGE);
        }
    }
    out.push_str("</section>\n");
}

fn render_file(out: &mut String, name: &str, entry: Option<&CacheEntry>, language: &str) {
    let _ = write!(out, "<details class=\"subchapter\"><summary>{}</summary>\n", esc(name));
    match entry {
        Some(CacheEntry::Ready(LoadOutcome::Loaded(content))) => {
            let _ = write!(
                out,
                "<div class=\"code-header\"><span>{}</span></div>\
                 <pre><code class=\"language-{}\">{}</code></pre>\n",
                esc(name),
                esc(language),
                content.escaped,
            );
        }
        Some(CacheEntry::Ready(LoadOutcome::Failed(err))) => {
            for line in err.lines() {
                let _ = writeln!(out, "<p class=\"error-details\">{}</p>", esc(&line));
            }
        }
        _ => {}
    }
    out.push_str("</details>\n");
}

/// Build the page. Every file is fetched once even if listed under several chapters.
pub fn render_page(
    config: &NbConfig,
    chapters: &[ChapterEntry],
    fetcher: &dyn Fetcher,
    activity: Option<&ActivityOutcome>,
) -> String {
    let mut cache = ContentLoader::new();
    for file in chapters.iter().flat_map(|c| c.files.iter()) {
        if let Some(seq) = cache.begin(file) {
            cache.complete(&file.encoded_path, seq, loader::load_file(fetcher, file));
        }
    }

    let title = esc(&config.display.title);
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<nav class=\"toc\">\n"
    );
    for (i, chapter) in chapters.iter().enumerate() {
        let _ = writeln!(
            out,
            "<a href=\"#{}\">{}</a>",
            chapter_anchor(i),
            esc(&chapter.label())
        );
    }
    out.push_str("</nav>\n<main>\n");
    let _ = write!(
        out,
        "<div class=\"welcome-message\"><h1 class=\"welcome-title\">{title}</h1>\
         <p class=\"welcome-subtitle\">{}</p></div>\n",
        esc(&config.display.subtitle)
    );
    if let Some(outcome) = activity {
        render_activity(&mut out, outcome);
    }

    for (i, chapter) in chapters.iter().enumerate() {
        let _ = write!(
            out,
            "<section id=\"{}\">\n<h2 class=\"chapter-title\">{}</h2>\n",
            chapter_anchor(i),
            esc(&chapter.title)
        );
        if chapter.files.is_empty() {
            out.push_str("<p>No files found for this chapter.</p>\n");
        }
        for file in &chapter.files {
            render_file(&mut out, &file.display_name, cache.get(file), &config.source.language);
        }
        out.push_str("</section>\n");
    }
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("write {}", path.display()))
}
