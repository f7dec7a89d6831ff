pub mod error;
pub mod samples;
pub mod store;
