use crate::models::{Entry, EntrySource, RawRecord};

pub fn normalize(raw: RawRecord, source: EntrySource) -> Entry {
    Entry {
        id: raw.id,
        date: raw.date,
        title: raw.title,
        content: raw.content,
        tags: raw.tags,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn tags_the_entry_with_its_source() {
        let raw = RawRecord {
            id: "1".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single(),
            title: "A".to_string(),
            content: "body".to_string(),
            tags: vec!["b".to_string(), "a".to_string()],
        };

        let entry = normalize(raw.clone(), EntrySource::Novel);

        assert_eq!(entry.source, EntrySource::Novel);
        assert_eq!(entry.id, raw.id);
        assert_eq!(entry.date, raw.date);
        assert_eq!(entry.tags, vec!["b", "a"]);
    }
}
