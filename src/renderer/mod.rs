//! WebGPU rendering module
//!
//! The scene is rebuilt from the game every frame as flat-colored triangles.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
