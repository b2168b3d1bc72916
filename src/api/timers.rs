//! Browser interval timers for the metronome
//!
//! The tick handler is a JS function registered by `startMetronome`. It is
//! kept on the main thread so a tempo change can restart the interval with
//! the same handler.

use std::cell::RefCell;

use crate::error::{Result, ScoreError};
use crate::metronome::{TimerHost, TimerId};

thread_local! {
    static TICK_HANDLER: RefCell<Option<js_sys::Function>> = RefCell::new(None);
}

pub fn set_tick_handler(handler: js_sys::Function) {
    TICK_HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));
}

pub fn clear_tick_handler() {
    TICK_HANDLER.with(|slot| *slot.borrow_mut() = None);
}

/// `setInterval`/`clearInterval` on the global window
pub struct BrowserTimers;

impl TimerHost for BrowserTimers {
    fn start_interval(&mut self, period_ms: u32) -> Result<TimerId> {
        let window = web_sys::window().ok_or_else(|| ScoreError::Timer("no window".to_string()))?;
        let handler = TICK_HANDLER
            .with(|slot| slot.borrow().clone())
            .ok_or_else(|| ScoreError::Timer("no metronome tick handler registered".to_string()))?;
        let timeout = i32::try_from(period_ms).unwrap_or(i32::MAX);
        window
            .set_interval_with_callback_and_timeout_and_arguments_0(&handler, timeout)
            .map(TimerId)
            .map_err(|e| ScoreError::Timer(format!("setInterval failed: {:?}", e)))
    }

    fn clear_interval(&mut self, id: TimerId) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(id.0);
        }
    }
}
