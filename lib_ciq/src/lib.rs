//! # lib_ciq
//!
//! Client library for the S&P Capital IQ Global Data Services (GDS) API.
//!
//! The GDS API answers batched queries keyed by security identifier and data
//! mnemonic. This crate builds the batched payload, submits it over HTTPS
//! with basic authentication, and reshapes the flat response back into a
//! nested mapping keyed by identifier and a caller-chosen return key.
//!
//! ## Contained Modules:
//!
//! - **`gds`**: The query builder, the response resolver, and the `CiqClient`
//!   call surface (GDSP, GDSPV, GDST, GDSHE, GDSHV, GDSG).
//!
//! - **`retrieve`**: The HTTP transport used to POST clientservice requests,
//!   built on `reqwest` with retry middleware.
//!
//! - **`counters`**: A file-persisted counter for the daily request quota.

// Declare the modules to re-export
pub mod counters;
pub mod gds;
pub mod retrieve;

// Re-export the primary call surface
pub use gds::cache::{MemoryResponseCache, ResponseCache};
pub use gds::client::{CiqClient, CiqClientOptions};
pub use gds::error::CiqError;
pub use gds::query::{PropertyMap, QueryKind};
pub use gds::resolve::{CiqValue, ResultMap};
