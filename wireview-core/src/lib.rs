/// Wireview Core Library - Scene, camera and projection logic
///
/// This library provides the renderer-agnostic core of the wireframe
/// viewer: vector math helpers, the perspective camera, the scene model
/// (vertices + edges + per-frame projected points), the Wavefront OBJ
/// parser, and the free-fly viewer state machine with its motion model.

pub mod camera;
pub mod input;
pub mod math;
pub mod obj;
pub mod scene;
pub mod viewer;

// Re-export commonly used types
pub use camera::{Camera, ScreenPoint};
pub use input::{InputEvent, MoveDirection, MovementFlags};
pub use obj::MeshError;
pub use scene::{Edge, Scene};
pub use viewer::Viewer;
