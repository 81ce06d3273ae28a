//! Write coalescing for burst-prone settings mutations

mod debounce;

pub use debounce::{DebouncedWriter, DEFAULT_DEBOUNCE};
