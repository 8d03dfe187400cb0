mod aggregator;
mod join;
mod normalize;
mod search;

pub use aggregator::Aggregator;
pub use join::join_all_settled;
pub use normalize::normalize;
pub use search::visible;
