#![no_std]

//! A single-pass decoder for HPROF heap snapshots.
//!
//! Hprof reads a captured virtual machine heap dump in one forward scan and
//! builds a queryable model of its strings, classes, objects and garbage
//! collection roots. Damaged or unfamiliar records are skipped using the
//! document's own framing, so a partially readable snapshot still yields a
//! model, alongside a list of warnings.
//!
//! Most users should begin with [`parse`] and the [`avec::HeapModel`] it
//! returns. To stream entities without building a model, implement
//! [`avec::FromHeap`] and call one of the [`avec`] decoders. If these prove
//! insufficient, the [`sans`] module exposes the underlying record and
//! sub-record decoders.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoder (default).

extern crate alloc;

pub mod avec;
pub mod sans;

pub use avec::parse;
