//! Host-computed values written into uniform buffers once per frame or on change.

pub mod render_params;
pub mod scene;
pub mod uniform;
pub mod waves;

pub use render_params::{RenderParams, RenderParamsUniform};
pub use scene::{QuadUniform, SceneClock, SceneUniform, plane_model_matrix};
pub use uniform::UniformBuffer;
pub use waves::{GerstnerWavesUniform, WaveParams};
