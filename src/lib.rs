// Library root: re-exports all modules so integration tests and external
// consumers (e.g. a web or GUI front end) can access the crate's public API.

pub mod config;
pub mod dataset;
pub mod scoring;
