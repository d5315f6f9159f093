#![forbid(unsafe_code)]
#![warn(
    clippy::cargo,
    clippy::suspicious,
    // missing_docs,
    clippy::nursery,
    rust_2018_idioms
)]

pub mod cloudwatch;
pub mod engine;
pub mod error;
pub mod glue;
pub mod metrics;
pub mod phases;
pub mod settings;
pub mod tracing;

pub type Result<T> = anyhow::Result<T>;
