#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EIP-155 (EVM) meta-transaction forwarding.
//!
//! This crate implements the client and verifier sides of the meta-transaction
//! protocol for EVM chains: a user signs an EIP-712 `ForwardRequest` off-chain,
//! any relayer submits it, and the [`forwarder::Forwarder`] recovers the
//! signer, enforces nonce and deadline, and executes the call attributed to
//! the original signer.
//!
//! # Architecture
//!
//! - [`builder`] - Completes partial requests with defaults and a fresh nonce
//! - [`typed`] - EIP-712 typed-data descriptor and deterministic signing hash
//! - [`signer`] - Signer adapter over alloy signers
//! - [`forwarder`] - In-process verifier/executor with a serialized nonce ledger
//! - [`relay`] - Relayer-side composition and pre-flight checks
//! - [`types`] - `sol!`-generated EIP-712 structs and conversions
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation on the verify/execute paths

pub mod builder;
pub mod forwarder;
pub mod relay;
pub mod signer;
pub mod typed;
pub mod types;

pub use builder::{NonceLookup, RequestBuilder};
pub use forwarder::Forwarder;
pub use relay::{MetaTxRequest, sign_meta_tx_request, submit};
pub use signer::{SignerLike, sign_forward_request};
pub use typed::TypedData;
