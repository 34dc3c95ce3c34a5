//! Converter module for rendering executed notebooks into reports.
//!
//! This module provides the `Converter` trait and an implementation backed by
//! `jupyter nbconvert`.
//!
//! # Example
//!
//! ```ignore
//! use xcorr_core::converter::{ConversionJob, Converter, ConverterConfig, NbconvertConverter, ReportFormat};
//!
//! let converter = NbconvertConverter::new(ConverterConfig::default());
//! converter.validate().await?;
//!
//! let job = ConversionJob::new(PathBuf::from("out/output_foo_vv.ipynb"), ReportFormat::Pdf);
//! let result = converter.convert(&job).await?;
//! println!("Wrote {:?}", result.output_path);
//! ```

mod config;
mod error;
mod nbconvert;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use nbconvert::NbconvertConverter;
pub use traits::Converter;
pub use types::{report_path_for, ConversionJob, ConversionResult, ReportFormat};
