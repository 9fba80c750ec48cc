//! Common library for the Playdeck application
//!
//! This crate provides shared functionality used across the Playdeck
//! services, most importantly the document store that persists per-owner
//! JSON documents with whole-document read/write semantics.

pub mod error;
pub mod store;
