use crate::index::ChapterEntry;

/// Case-insensitive substring match. An empty query matches everything.
pub fn matches_query(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    text.to_lowercase().contains(&query.to_lowercase())
}

/// Indices of chapters whose TOC label matches the query, in TOC order.
pub fn visible_chapters(chapters: &[ChapterEntry], query: &str) -> Vec<usize> {
    chapters
        .iter()
        .enumerate()
        .filter(|(_, c)| matches_query(&c.label(), query))
        .map(|(i, _)| i)
        .collect()
}
