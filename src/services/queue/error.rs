/// Errors from queue operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Index past the end of the queue
    #[error("Queue index {index} out of range (queue has {len} entries)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Queue length at the time
        len: usize,
    },

    /// The queue has no entries
    #[error("Queue is empty")]
    Empty,
}
