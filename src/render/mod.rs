//! Presentation sinks
//!
//! Sinks receive a read-only snapshot after every advancing cycle and have no
//! way to write back into the session.

mod console;

pub use console::ConsoleRenderer;

use crate::cycle::SessionSnapshot;

/// Consumer of session state after each cycle
pub trait RenderSink: Send + Sync {
    fn render(&self, snapshot: &SessionSnapshot<'_>);
}
