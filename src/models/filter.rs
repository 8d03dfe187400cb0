use std::str::FromStr;

use super::EntrySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Summary,
    Novel,
}

impl KindFilter {
    pub fn matches(&self, source: EntrySource) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Summary => source == EntrySource::Summary,
            KindFilter::Novel => source == EntrySource::Novel,
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            KindFilter::All => KindFilter::Summary,
            KindFilter::Summary => KindFilter::Novel,
            KindFilter::Novel => KindFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KindFilter::All => "All",
            KindFilter::Summary => "Summaries",
            KindFilter::Novel => "Novels",
        }
    }
}

impl FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(KindFilter::All),
            "summary" | "summaries" => Ok(KindFilter::Summary),
            "novel" | "novels" => Ok(KindFilter::Novel),
            other => Err(format!("unknown kind '{other}', expected all, summary or novel")),
        }
    }
}
