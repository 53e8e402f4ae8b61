pub mod app;
pub mod config;
pub mod error;
pub mod model_download;
pub mod pipeline;
pub mod render;
pub mod surface;
pub mod types;
