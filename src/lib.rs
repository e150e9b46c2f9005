//! Symbology Convert: console client library
//!
//! Signs in to the data platform through an interactive OAuth2 login loop,
//! converts instrument identifiers with the symbology endpoint, and prints
//! or exports the result.

pub mod auth;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod report;
pub mod symbology;
pub mod transport;
pub mod utils;
