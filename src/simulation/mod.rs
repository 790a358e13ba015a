pub mod seed;
pub mod state_store;
pub mod types;

pub use state_store::SimulationStateStore;
pub use types::{BodyLayout, BodyVec4, BufferRole};
