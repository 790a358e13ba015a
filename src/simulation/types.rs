use bytemuck::{Pod, Zeroable};

/// Bytes per body in each of the position and velocity buffers
pub const ELEMENT_STRIDE: u64 = std::mem::size_of::<BodyVec4>() as u64;

/// One body's position (xyz + homogeneous w) or velocity (xyz + padding)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BodyVec4(pub [f32; 4]);

const _: () = assert!(
    std::mem::size_of::<BodyVec4>() == 16,
    "size of BodyVec4 does not match WGSL vec4<f32>"
);

impl BodyVec4 {
    pub fn xyz(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn length3(&self) -> f32 {
        let [x, y, z] = self.xyz();
        (x * x + y * y + z * z).sqrt()
    }
}

/// Which of the two position buffers is meant
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferRole {
    PositionsIn,
    PositionsOut,
}

impl BufferRole {
    /// The buffer holding the current state for a given ping-pong index
    pub fn for_frame_idx(frame_idx: usize) -> Self {
        if frame_idx == 0 {
            BufferRole::PositionsIn
        } else {
            BufferRole::PositionsOut
        }
    }

    pub fn other(self) -> Self {
        match self {
            BufferRole::PositionsIn => BufferRole::PositionsOut,
            BufferRole::PositionsOut => BufferRole::PositionsIn,
        }
    }
}

/// Byte layout of the per-body buffers
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BodyLayout {
    pub element_stride: u64,
}

impl Default for BodyLayout {
    fn default() -> Self {
        Self {
            element_stride: ELEMENT_STRIDE,
        }
    }
}

impl BodyLayout {
    pub fn buffer_size(&self, count: u32) -> u64 {
        self.element_stride * count as u64
    }
}
