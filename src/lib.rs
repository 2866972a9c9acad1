pub mod audio;
pub mod config;
pub mod engine;
pub mod frame_loop;
pub mod utils;
