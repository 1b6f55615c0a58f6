pub mod backend;
pub mod config;
mod crc;
#[cfg(feature = "render")]
mod draw;
pub mod icon_gen;
pub mod manifest;
pub mod raw_png;
#[cfg(feature = "render")]
pub mod render;
