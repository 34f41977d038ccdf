use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::error;
use wasm_bindgen::prelude::*;

#[derive(Default)]
struct Inner {
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
	pending: Cell<Option<i32>>,
}

/// A `requestAnimationFrame` loop with at most one frame in flight.
///
/// The installed callback returns whether it wants another frame. When it
/// says no the loop goes idle until [`FrameLoop::wake`] is called.
#[derive(Clone, Default)]
pub struct FrameLoop {
	inner: Rc<Inner>,
}

impl FrameLoop {
	/// Replace the per-frame callback. Any pending frame is cancelled.
	pub fn install(&self, mut on_frame: impl FnMut() -> bool + 'static) {
		self.stop();
		let weak: Weak<Inner> = Rc::downgrade(&self.inner);
		let callback = Closure::<dyn FnMut()>::new(move || {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			inner.pending.set(None);
			if on_frame() {
				request(&inner);
			}
		});
		*self.inner.callback.borrow_mut() = Some(callback);
	}

	/// Schedule a frame unless one is already pending.
	pub fn wake(&self) {
		request(&self.inner);
	}

	/// Cancel the pending frame and drop the callback.
	pub fn stop(&self) {
		self.cancel();
		self.inner.callback.borrow_mut().take();
	}

	/// Cancel the pending frame, keeping the callback installed.
	pub fn cancel(&self) {
		if let Some(handle) = self.inner.pending.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(handle);
			}
		}
	}
}

fn request(inner: &Inner) {
	if inner.pending.get().is_some() {
		return;
	}
	let callback = inner.callback.borrow();
	let Some(callback) = callback.as_ref() else {
		return;
	};
	let Some(window) = web_sys::window() else {
		error!("no window to schedule animation frames on");
		return;
	};
	match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
		Ok(handle) => inner.pending.set(Some(handle)),
		Err(err) => error!("requestAnimationFrame failed: {:?}", err),
	}
}
