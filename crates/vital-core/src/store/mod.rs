//! Stored document shapes

mod document;

pub use document::TrackerDocument;
