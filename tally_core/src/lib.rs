#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core counting-session logic (hardware-agnostic).
//!
//! This crate provides the session state machinery shared by every station
//! front end. All hardware interactions go through the
//! `tally_traits::WeightSource` and `tally_traits::CrossingDetector`
//! traits.
//!
//! ## Architecture
//!
//! - **Session**: the live tally, status, lot tag, and captured partials
//!   (`session` module) — the single source of truth
//! - **Partials**: immutable weighed-batch snapshots (`partial` module)
//! - **Aggregates**: pure on-demand totals/averages (`aggregate` module)
//! - **Station**: the facade owning session + collaborators (`station`,
//!   `builder` modules)
//! - **Feed**: background crossing-event delivery (`feed` module)
//!
//! The live tally is cumulative across the whole session: capturing a
//! partial snapshots the tally but does not reset it, while the weight is
//! sampled independently per batch.

pub mod aggregate;
pub mod builder;
pub mod error;
pub mod feed;
pub mod mocks;
pub mod partial;
pub mod session;
pub mod station;

pub use aggregate::{AggregateSnapshot, CompletionEvent, compute_aggregate};
pub use builder::StationBuilder;
pub use error::{BuildError, TallyError};
pub use partial::{Partial, PartialId};
pub use session::{CountingSession, SessionStatus};
pub use station::{CompletionHook, Station};
