//! # Data Retrieval Module
//!
//! Generic HTTP plumbing for the clientservice endpoint, kept separate from
//! the GDS protocol logic so the resolver and builder stay network-free.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// HTTP POST transport with basic authentication and retry middleware.
pub mod gds_http;
