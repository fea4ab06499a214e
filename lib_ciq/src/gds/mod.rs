//! # Capital IQ GDS Module
//!
//! This module groups everything specific to the GDS clientservice protocol:
//! building the batched `inputRequests` payload, decoding the
//! `GDSSDKResponse` envelope, and resolving each response record back to the
//! caller's return keys.
//!
//! ## Contained Modules:
//!
//! - **`query`**: Query kinds, elementary query records, and the request
//!   builder (cross product of identifiers and mnemonics, copy-then-merge of
//!   call-level date options).
//!
//! - **`resolve`**: The return-key index and the response resolver. This is
//!   where an ambiguous mnemonic (requested more than once with different
//!   property sets) is matched back to the right return key.
//!
//! - **`client`**: The `CiqClient` call surface, one method per GDS function.
//!
//! - **`wire`**: Serde models for the request and response JSON.
//!
//! - **`cache`**: The response-cache seam consulted before each POST.
//!
//! - **`error`**: The `CiqError` taxonomy.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Response-cache seam keyed by the serialized request body.
pub mod cache;
/// The `CiqClient` call surface, one method per GDS function kind.
pub mod client;
/// Error taxonomy for contract, transport, and resolution failures.
pub mod error;
/// Query kinds, elementary queries, and the batched request builder.
pub mod query;
/// Return-key index and response resolver.
pub mod resolve;
/// Serde models for the GDS wire formats.
pub mod wire;
