pub mod error;
pub mod panels;
pub mod render;
