//! Platform layer: window management and input.
//!
//! - Window creation and Vulkan surface creation via winit + ash-window
//! - Keyboard/mouse state tracking, including cursor capture for
//!   first-person look

mod input;
mod window;

pub use input::{InputState, KeyCode, MouseButton};
pub use window::{Surface, Window};

// Re-export winit types that users might need
pub use winit::event::{Event, WindowEvent};
pub use winit::event_loop::EventLoop;
