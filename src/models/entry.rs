use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySource {
    Summary,
    Novel,
}

impl EntrySource {
    pub fn label(&self) -> &'static str {
        match self {
            EntrySource::Summary => "DIARY",
            EntrySource::Novel => "NOVEL",
        }
    }
}

/// One diary summary or novel chapter, normalized from either collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    /// `None` when the row carried no readable date.
    pub date: Option<DateTime<Utc>>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub source: EntrySource,
}

impl Entry {
    pub fn display_date(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "----------".to_string(),
        }
    }

    /// `#tag` labels, novels first carrying the `#小説` marker. `limit` caps
    /// how many of the entry's own tags are included.
    pub fn display_tags(&self, limit: Option<usize>) -> Vec<String> {
        let marker = (self.source == EntrySource::Novel).then(|| "#小説".to_string());
        let take = limit.unwrap_or(self.tags.len());

        marker
            .into_iter()
            .chain(self.tags.iter().take(take).map(|t| format!("#{t}")))
            .collect()
    }
}

/// A row as returned by the store for the `id,date,title,content,tags` projection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(serde_json::Number),
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Number(n) => n.to_string(),
    })
}

// A bad date never rejects the row; it is kept undated.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let date = match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(raw) => parse_date(&raw).or_else(|| {
            tracing::warn!("Unreadable entry date {:?}", raw);
            None
        }),
        other => {
            tracing::warn!("Unreadable entry date {}", other);
            None
        }
    };
    Ok(date)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a plain `date` column, an RFC 3339 timestamp, or a timestamp
/// without zone (read as UTC).
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}
