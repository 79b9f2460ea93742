//! EpusdtPay gateway protocol library.
//!
//! Everything needed to talk to an EpusdtPay-compatible crypto payment
//! gateway: the canonical MD5 field-signing scheme shared by both sides,
//! the order-creation wire objects and HTTP client, and the verifier for
//! the gateway's asynchronous payment callbacks.
//!
//! This crate is deliberately free of panel state: callback verification
//! is pure, and the client mutates nothing locally. Order settlement
//! lives in `billgate-core`.

pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod objects;
pub mod signature;
