//! Persistent counters for request accounting.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Day-scoped request counter persisted to a plain file.
pub mod request_count;
