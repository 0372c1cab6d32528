//! Render structured log records as a message line followed by a bordered
//! table of their metadata.
//!
//! # Overview
//!
//! Plain log lines are fine until a record carries a dozen context values, a
//! nested map and an exception with two causes. `tracing-tabular` renders
//! such a record as a single message line, then a table with a
//! "General Info" section (time and level), an "Extra" section and a
//! "Context" section, with every exception expanded into its cause chain.
//!
//! The heart of the crate is the [`TableFormatter`], which turns a [`Record`]
//! into a block of text. [`TableLayer`] plugs it into [`tracing-subscriber`],
//! turning every `tracing` event into a record.
//!
//! [`tracing-subscriber`]: tracing_subscriber
//!
//! # Getting started
//!
//! ```
//! use tracing::Level;
//! use tracing_tabular::config::FormatterConfig;
//! use tracing_tabular::formatter::TableFormatter;
//! use tracing_tabular::record::{Record, Throwable};
//!
//! let mut formatter = TableFormatter::new(FormatterConfig::default()).unwrap();
//!
//! let error = Throwable::new("IoError", "disk full")
//!     .with_code(28)
//!     .caused_by(Throwable::new("QuotaError", "quota exceeded"));
//!
//! let record = Record::new(Level::ERROR, "upload failed")
//!     .channel("storage")
//!     .with_context("file_name", "report.pdf")
//!     .with_context("exception", error);
//!
//! let block = formatter.format(&record).unwrap();
//! assert!(block.contains("storage.ERROR: upload failed"));
//! assert!(block.contains("previous Throwable"));
//! ```
//! ```log
//! ======================================================================================================================================================
//! [2022-03-24T16:08:17+00:00] storage.ERROR: upload failed
//!
//! ┌──────────────────────┬──────────────────────┬──────────────────────────────────────────────────────────────────────────────────────────────────────┐
//! │ General Info                                                                                                                                       │
//! │ Time                 │ 2022-03-24T16:08:17+00:00                                                                                                   │
//! │ Level                │ ERROR                                                                                                                       │
//! ├──────────────────────┼──────────────────────┼──────────────────────────────────────────────────────────────────────────────────────────────────────┤
//! │ Context                                                                                                                                            │
//! │ File name            │ report.pdf                                                                                                                  │
//! │ Exception            │ Throwable            │ 28                                                                                                   │
//! │                      │ File                 │                                                                                                      │
//! │                      │ Line                 │ 0                                                                                                    │
//! │                      │ Message              │ disk full                                                                                            │
//! │                      │ Type                 │ IoError                                                                                              │
//! ├──────────────────────┼──────────────────────┼──────────────────────────────────────────────────────────────────────────────────────────────────────┤
//! │                      │ previous Throwable   │ 0                                                                                                    │
//! │                      │ File                 │                                                                                                      │
//! │                      │ Line                 │ 0                                                                                                    │
//! │                      │ Message              │ quota exceeded                                                                                       │
//! │                      │ Type                 │ QuotaError                                                                                           │
//! └──────────────────────┴──────────────────────┴──────────────────────────────────────────────────────────────────────────────────────────────────────┘
//!
//! ```
//!
//! # With `tracing`
//!
//! With the default `layer` feature, [`TableLayer`] formats `tracing` events.
//! Event fields become the record's context, the fields of enclosing spans
//! become its extra, and the event's target becomes its channel.
//! ```
//! use tracing_subscriber::prelude::*;
//! use tracing_tabular::config::FormatterConfig;
//! use tracing_tabular::formatter::TableFormatter;
//! use tracing_tabular::TableLayer;
//!
//! let formatter = TableFormatter::new(FormatterConfig::default()).unwrap();
//! let layer = TableLayer::new(formatter).with_test_writer();
//!
//! tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), || {
//!     tracing::warn!(attempts = 3, "retrying");
//! });
//! ```
//!
//! # Configuration
//!
//! [`FormatterConfig`] holds the message template, the table style, the date
//! format, the normalization limits and the line break policy. It can be
//! built with chained setters or deserialized with `serde`.
//!
//! [`FormatterConfig`]: crate::config::FormatterConfig
//! [`TableFormatter`]: crate::formatter::TableFormatter
//! [`Record`]: crate::record::Record
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod formatter;
pub mod normalizer;
pub mod output;
pub mod record;
pub mod table;
#[doc(hidden)]
#[macro_use]
mod cfg;
#[macro_use]
mod macros;

cfg_layer! {
    pub mod layer;
    mod fail;
    pub use crate::layer::TableLayer;
}

pub use crate::formatter::TableFormatter;
pub use crate::record::{Fields, Record, Throwable, Value};
