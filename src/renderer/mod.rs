//! Renderer: frame buffers and differential terminal output.

mod buffer;
mod diff;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
