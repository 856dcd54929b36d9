//! modelmeta - Declarative model metadata and validation engine
//!
//! Turns a bag of field definitions into model metadata, then validates
//! model instances against it. Validation produces a structured report of
//! every violation found; it never fails fast on invalid data.

pub mod cli;
pub mod config;
pub mod fields;
pub mod operation;
pub mod record;
pub mod registry;
pub mod validation;
