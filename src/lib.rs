//! GPU compute simulations driven from a double-buffered frame loop: an
//! n-body system ping-ponging storage buffers, Gerstner ocean waves, and a
//! compute image filter.

pub mod app;
pub mod config;
pub mod demos;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod meshes;
pub mod params;
pub mod pipeline;
pub mod rendering;
pub mod shaders;
pub mod simulation;
