use crate::app::App;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Arrow keys nudge a virtual pointer while a round is running.
pub fn wire_global_keydown(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    let app = app.clone();
    let closure = Closure::wrap(
        Box::new(move |ev: web::KeyboardEvent| app.on_key(&ev)) as Box<dyn FnMut(_)>
    );
    _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
