use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Owns the `setInterval` that keeps the audio horizon filled.
///
/// At most one interval exists per timer: `start` clears the previous one
/// first, so a restart can never leave two schedulers writing to the same
/// voices.
#[derive(Default)]
pub struct SchedulerTimer {
    handle: Option<i32>,
    callback: Option<Closure<dyn FnMut()>>,
}

impl SchedulerTimer {
    pub fn start(&mut self, period_ms: u32, mut tick: impl FnMut() + 'static) {
        self.stop();
        let Some(window) = web::window() else {
            return;
        };
        let callback = Closure::wrap(Box::new(move || tick()) as Box<dyn FnMut()>);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms as i32,
        ) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.callback = Some(callback);
                log::debug!("[sched] interval {} every {}ms", handle, period_ms);
            }
            Err(e) => log::warn!("[sched] setInterval failed: {:?}", e),
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web::window() {
                window.clear_interval_with_handle(handle);
            }
            log::debug!("[sched] cleared interval {}", handle);
        }
        self.callback = None;
    }
}

impl Drop for SchedulerTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
