use crate::models::{Entry, KindFilter};

/// Entries matching both the text query and the kind filter, in input order.
///
/// The text query is a case-insensitive substring match against the title,
/// the content, or any tag. An empty query matches everything.
pub fn visible<'a>(entries: &'a [Entry], query: &str, kind: KindFilter) -> Vec<&'a Entry> {
    let needle = query.to_lowercase();

    entries
        .iter()
        .filter(|e| kind.matches(e.source))
        .filter(|e| needle.is_empty() || matches_text(e, &needle))
        .collect()
}

fn matches_text(entry: &Entry, needle: &str) -> bool {
    entry.title.to_lowercase().contains(needle)
        || entry.content.to_lowercase().contains(needle)
        || entry.tags.iter().any(|t| t.to_lowercase().contains(needle))
}
