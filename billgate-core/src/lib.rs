#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

//! Domain core of the billgate payment panel.
//!
//! Owns the pieces with real correctness hazards: the order state machine
//! that settles verified gateway callbacks exactly once, and the
//! idempotent notification gate that keeps duplicate triggers (webhook
//! retries, concurrent reminder sweeps) from producing duplicate
//! user-visible side effects.

pub mod entities;
pub mod events;
pub mod gate;
pub mod ledger;
pub mod notifier;
pub mod processors;
pub mod reminder;
pub mod settlement;
pub mod users;
