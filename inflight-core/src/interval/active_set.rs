use crate::interval::IndexedHeap;

/// Requests whose start has been seen and whose end has not, ordered by
/// start time. Requests starting at the same millisecond keep their
/// insertion order.
#[derive(Debug, Default)]
pub struct ActiveSet {
    open: IndexedHeap<String, (i64, u64)>,
    inserted: u64,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn contains(&self, request_id: &str) -> bool {
        self.open.contains(request_id)
    }

    /// Id of the longest running request.
    pub fn oldest(&self) -> Option<&str> {
        self.open.peek().map(|(id, _)| id.as_str())
    }

    /// Returns false when the id is already open.
    pub fn open(&mut self, request_id: &str, started_ms: i64) -> bool {
        self.inserted += 1;
        self.open
            .insert(request_id.to_string(), (started_ms, self.inserted))
    }

    /// Returns false when the id was not open.
    pub fn close(&mut self, request_id: &str) -> bool {
        self.open.remove(request_id).is_some()
    }
}
