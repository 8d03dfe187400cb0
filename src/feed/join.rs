use std::future::Future;

use futures::future::join_all;

use crate::error::Result;

/// Waits for every future to settle, then yields all values in dispatch order,
/// or the first error in dispatch order. A failure never cancels its siblings;
/// their results are discarded.
pub async fn join_all_settled<I, F, T>(futures: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>>,
{
    join_all(futures).await.into_iter().collect()
}
