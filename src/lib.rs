pub mod app;
pub mod config;
pub mod pipeline;
pub mod shared;
pub mod storage;
