mod entry;
mod filter;

pub use entry::{Entry, EntrySource, RawRecord};
pub use filter::KindFilter;
