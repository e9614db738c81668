pub mod build;
pub mod render;
