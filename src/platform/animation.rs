//! requestAnimationFrame driver
//!
//! One callback per display refresh. The pending frame is cancelled when the
//! loop is stopped or dropped, so nothing steps after teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

type FrameFn = Box<dyn FnMut(f64)>;

struct LoopInner {
    running: Cell<bool>,
    handle: Cell<Option<i32>>,
    on_frame: RefCell<FrameFn>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopInner {
    fn schedule(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = self.callback.borrow();
        if let Some(callback) = callback.as_ref() {
            let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.handle.set(Some(id));
        }
        Ok(())
    }

    fn cancel(&self) {
        self.running.set(false);
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

/// Handle to a running frame loop
pub struct AnimationLoop {
    inner: Rc<LoopInner>,
}

impl AnimationLoop {
    /// Start calling `on_frame(timestamp_ms)` once per refresh
    pub fn start<F>(on_frame: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let inner = Rc::new(LoopInner {
            running: Cell::new(true),
            handle: Cell::new(None),
            on_frame: RefCell::new(Box::new(on_frame)),
            callback: RefCell::new(None),
        });

        // Weak so the closure stored inside `inner` does not keep it alive
        let weak = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handle.set(None);
            if !inner.running.get() {
                return;
            }
            (inner.on_frame.borrow_mut())(now);
            if inner.running.get() {
                if let Err(e) = inner.schedule() {
                    log::error!("Frame loop stopped: {:?}", e);
                    inner.running.set(false);
                }
            }
        });
        *inner.callback.borrow_mut() = Some(callback);
        inner.schedule()?;

        log::debug!("Frame loop started");
        Ok(Self { inner })
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Cancel the pending frame; no further callbacks run
    pub fn stop(&self) {
        if self.inner.running.get() {
            log::debug!("Frame loop stopped");
        }
        self.inner.cancel();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}
