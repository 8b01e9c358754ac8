//! GPU device and window surface.
//!
//! The scene is handed to renderers as a [`crate::scene::FrameSnapshot`]; this module
//! only owns what every frame needs regardless of renderer: a configured surface that
//! can be cleared to the background colour and presented.

mod gpu;
mod init;
mod surface;

pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
