//! Feasibility scoring for French mortgage-loan applications.
//!
//! The [`scoring`] engine is a pure function over a [`scoring::LoanApplication`] and a
//! [`rates::RateSnapshot`]. Everything around it (rate refresh, paid dossier storage, report
//! rendering, HTTP routing) lives in the remaining modules and only feeds it data.

pub mod config;
pub mod dossier;
pub mod error;
pub mod rates;
pub mod report;
pub mod scoring;
pub mod telemetry;
