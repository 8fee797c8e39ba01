//! GLib main-loop integration for the UI queue.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glib::{ControlFlow, SourceId};

use crate::host::HostWindow;
use crate::ui_queue::UiQueue;

/// How often queued jobs are picked up.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drain `queue` against `window` from the GLib main loop.
///
/// Must be called on the thread that runs the main context. The returned
/// source keeps polling until removed.
pub fn attach_to_main_loop<W>(queue: UiQueue, window: Rc<RefCell<W>>) -> SourceId
where
    W: HostWindow + 'static,
{
    glib::timeout_add_local(POLL_INTERVAL, move || {
        // Window busy in a signal handler; retry on the next tick.
        if let Ok(mut window) = window.try_borrow_mut() {
            queue.run_pending(&mut *window);
        }
        ControlFlow::Continue
    })
}
