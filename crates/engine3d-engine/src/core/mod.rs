//! Contracts between the runtime loop and applications.
//!
//! An [`App`] receives window events and one [`FrameCtx`] per frame; it
//! never touches the event loop or surface directly.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
