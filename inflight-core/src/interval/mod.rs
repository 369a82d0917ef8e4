mod active_set;
mod heap;

pub use active_set::ActiveSet;
pub use heap::IndexedHeap;
