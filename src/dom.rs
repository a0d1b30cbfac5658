use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(web::MouseEvent) + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            Closure::wrap(Box::new(move |ev: web::MouseEvent| handler(ev)) as Box<dyn FnMut(_)>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] missing #{}", element_id);
    }
}

pub fn add_pointer_listener(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut(web::PointerEvent) + 'static,
) {
    let closure =
        Closure::wrap(Box::new(move |ev: web::PointerEvent| handler(ev)) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn html_element(document: &web::Document, id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

/// CSS pixel size of the layout viewport.
pub fn viewport_size() -> Option<(f32, f32)> {
    let w = web::window()?;
    let width = w.inner_width().ok()?.as_f64()?;
    let height = w.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

/// Bottom edge of an element in viewport coordinates.
pub fn bottom_of(document: &web::Document, id: &str) -> Option<f32> {
    document
        .get_element_by_id(id)
        .map(|el| el.get_bounding_client_rect().bottom() as f32)
}

/// Id of the element an event was dispatched to, or "".
pub fn event_target_id(ev: &web::Event) -> String {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| el.id())
        .unwrap_or_default()
}
