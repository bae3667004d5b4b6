//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into colored triangles each frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, pixel_to_ndc};
pub use vertex::Vertex;
