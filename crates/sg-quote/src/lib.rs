//! Freight quote intake for SG Transportes.
//!
//! A quote submission posted by the public web form is normalized, rendered
//! into a plain-text and an HTML email, and handed to a [`quote::Mailer`].

pub mod config;
pub mod error;
pub mod quote;
pub mod telemetry;
