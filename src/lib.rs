//! Reconciliation of store working hours between a customer sheet and a
//! database export.
//!
//! The modules are kept narrow and composable: raw spreadsheet access lives
//! under [`staffing::recon::io`], address canonicalisation in
//! [`staffing::recon::normalize`], sheet parsing in [`staffing::recon::parse`],
//! the variant merger, aggregation and diff in [`staffing::recon::merge`] and
//! [`staffing::recon::aggregate`], report assembly in
//! [`staffing::recon::report`], and the end-to-end orchestration under
//! [`staffing::recon::sync`].

pub mod staffing;

pub use staffing::recon::{
    ReconConfig, ReconError, Result, aggregate, config, error, io, merge, model, normalize, parse,
    report, sync,
};
