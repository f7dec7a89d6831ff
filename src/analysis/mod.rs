pub mod comparison;
pub mod density;
pub mod error;
pub mod rolling;
pub mod summary;
pub mod welch;
