//! uCUnit JSON report model and JUnit XML conversion.
//!
//! A report produced by the uCUnit JSON output module is decoded and validated
//! into a [`Report`], converted into a [`JUnitSuite`] document tree, and
//! serialized as JUnit-compatible XML.

mod error;
mod junit;
mod model;

pub use error::ReportError;
pub use junit::{convert, convert_with, ConvertOptions, JUnitCase, JUnitSuite, Property};
pub use model::{Check, Report, TestCase, PASSED};

