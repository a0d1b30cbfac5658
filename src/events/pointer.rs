use crate::app::App;
use crate::constants::{FIELD_ID, HUD_ID, RESTART_BUTTON_ID, START_BUTTON_ID, TARGET_ID};
use crate::dom;
use glam::Vec2;
use noy_core::StartPrime;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub fn wire_buttons(app: &Rc<App>) {
    let app_start = app.clone();
    dom::add_click_listener(&app.document, START_BUTTON_ID, move |ev| {
        let prime = StartPrime::from_click(ev.client_x() as f32, ev.client_y() as f32);
        log::info!("[click] start");
        spawn_local(app_start.clone().start_round(prime));
    });

    let app_restart = app.clone();
    dom::add_click_listener(&app.document, RESTART_BUTTON_ID, move |_| {
        log::info!("[click] restart");
        spawn_local(app_restart.clone().start_round(StartPrime::Keep));
    });
}

/// Clicks on buttons or the HUD never count as a reveal attempt.
fn is_chrome_click(document: &web::Document, ev: &web::MouseEvent) -> bool {
    let id = dom::event_target_id(ev);
    if id == START_BUTTON_ID || id == RESTART_BUTTON_ID {
        return true;
    }
    let (Some(hud), Some(node)) = (
        document.get_element_by_id(HUD_ID),
        ev.target().and_then(|t| t.dyn_into::<web::Node>().ok()),
    ) else {
        return false;
    };
    hud.contains(Some(&node))
}

pub fn wire_field(app: &Rc<App>) {
    let Some(field) = app.document.get_element_by_id(FIELD_ID) else {
        log::warn!("[dom] missing #{}", FIELD_ID);
        return;
    };

    for event in ["pointermove", "pointerdown"] {
        let app = app.clone();
        dom::add_pointer_listener(&field, event, move |ev| {
            app.on_pointer(Vec2::new(ev.client_x() as f32, ev.client_y() as f32));
        });
    }

    let app_click = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        if is_chrome_click(&app_click.document, &ev) {
            return;
        }
        app_click.on_reveal_click();
    }) as Box<dyn FnMut(_)>);
    _ = field.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();

    let app_target = app.clone();
    dom::add_click_listener(&app.document, TARGET_ID, move |_| {
        app_target.on_reveal_click();
    });
}

pub fn wire_resize(app: &Rc<App>) {
    let Some(window) = web::window() else {
        return;
    };
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move || app.on_resize()) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}
