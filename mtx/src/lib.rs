#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for EIP-712 meta-transaction forwarding.
//!
//! This crate provides the foundational, chain-agnostic types for relaying
//! gasless ("meta") transactions: a user signs an off-chain structured
//! message authorizing a call, and any relayer submits it to a forwarder
//! that verifies the signature, enforces replay protection, and executes
//! the call on the signer's behalf. Chain-specific encoding, signing, and
//! the forwarder itself are provided by separate crates.
//!
//! # Overview
//!
//! A [`request::ForwardRequest`] captures delegated intent: signer `from`
//! wants `to` to receive `data` with `value`, bounded by `gas` and
//! `deadline`, at the signer's current `nonce`. A [`domain::ForwardDomain`]
//! binds the resulting signature to one specific forwarder deployment so it
//! cannot be replayed cross-contract or cross-chain.
//!
//! # Modules
//!
//! - [`dispatch`] - Capability-typed target dispatch (opaque handlers keyed by address)
//! - [`domain`] - Signing-domain identity for a forwarder deployment
//! - [`error`] - Error taxonomy, machine-readable reasons, and retry policy
//! - [`nonce`] - Keyed per-address nonce counter store
//! - [`request`] - The forward-request data model
//! - [`timestamp`] - Unix timestamps with 48-bit wire bounds
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod dispatch;
pub mod domain;
pub mod error;
pub mod nonce;
pub mod request;
pub mod timestamp;

pub use domain::ForwardDomain;
pub use error::{ErrorReason, ForwardError, Remediation};
pub use request::{ForwardRequest, ForwardRequestInput, SignedForwardRequest};
pub use timestamp::UnixTimestamp;
