//! Terminal player for greedyviz.
//!
//! This module holds the testable application state and key handling. The
//! terminal I/O loop lives in the `greedyviz-tui` binary and drawing lives in
//! [`crate::renderers::tui`].

pub mod app;

pub use app::VizApp;
