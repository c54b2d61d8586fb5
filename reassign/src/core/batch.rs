use crate::common::topic_partition::TopicMetadata;

/// Anything the engine can batch; batches are tracked by topic name.
pub trait BatchItem {
    fn topic(&self) -> &str;
}

impl BatchItem for String {
    fn topic(&self) -> &str {
        self
    }
}

impl BatchItem for TopicMetadata {
    fn topic(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<I> {
    /// 0-based position, also used to name the batch's artifacts.
    pub id: usize,
    pub items: Vec<I>,
}

impl<I: BatchItem> Batch<I> {
    pub fn topics(&self) -> Vec<String> {
        self.items.iter().map(|i| i.topic().to_string()).collect()
    }
}

/// Splits `items` into consecutive batches of `batch_size`, keeping order.
/// The last batch may be shorter. A `batch_size` of 0 is treated as 1.
pub fn plan<I>(items: Vec<I>, batch_size: usize) -> Vec<Batch<I>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity((items.len() + batch_size - 1) / batch_size);
    let mut current = Vec::with_capacity(batch_size);

    for item in items {
        current.push(item);
        if current.len() == batch_size {
            batches.push(Batch {
                id: batches.len(),
                items: std::mem::replace(&mut current, Vec::with_capacity(batch_size)),
            });
        }
    }
    if !current.is_empty() {
        batches.push(Batch {
            id: batches.len(),
            items: current,
        });
    }

    batches
}
