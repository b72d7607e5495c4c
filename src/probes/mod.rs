//! Extraction probes run against the live page.
//!
//! Probes are mutually independent and infallible at their boundary: any
//! internal failure is logged and degrades to an empty default, never
//! aborting the scrape.

pub mod performance;
pub mod viewport;
pub mod visual;
