//! Synthetic training corpus generator for shell command correction.
//!
//! The library turns pattern catalogs into (incorrect, correct) command pairs
//! across six shells and four corpus segments, enforcing the null and
//! single-character quality rules along the way.
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod corrupt;
pub mod example;
pub mod output;
pub mod quality;
pub mod report;
pub mod shell;
pub mod synth;
pub mod types;
pub mod vars;
