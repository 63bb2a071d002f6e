#![doc = "converterxmlcsv-core: core logic library for converterxmlcsv."]

//! This crate contains the data model, XML parsing, CSV export and conversion
//! pipelines for converterxmlcsv. Terminal interaction lives in the CLI crate.
//!
//! # Usage
//! Add this as a dependency for anything that needs to turn a payroll XML
//! export (`comissao_*.xml`, `vales_*.xml`) into a CSV file.

pub mod contract;
pub mod convert;
pub mod discover;
pub mod error;
pub mod export;
pub mod parse;

pub use error::ConvertError;
