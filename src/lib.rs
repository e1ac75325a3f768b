//! Payroll Tax Calculation Engine for US federal, state, and local taxes
//!
//! This crate computes gross-to-net payroll for a single pay period: federal
//! income tax withholding and FICA, state income tax with cross-state
//! reciprocity resolution, local (county/city/school-district) taxes, and
//! employer-side taxes (FUTA, SUTA, employer FICA match).

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod providers;
