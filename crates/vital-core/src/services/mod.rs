//! Service wrappers shared by Vital front ends

mod store;

pub use store::TrackerStore;
