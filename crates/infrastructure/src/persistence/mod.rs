//! File persistence adapters.

mod object_store;

pub use object_store::FileObjectStore;
