use crate::constants::{FOUND_CLASS, HIDDEN_CLASS, HOT_CLASS, MSG_ID, TARGET_ID};
use crate::dom;
use glam::Vec2;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.remove_attribute("hidden");
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("hidden", "");
    }
}

pub fn set_message(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(MSG_ID) {
        el.set_text_content(Some(text));
    }
}

/// Move the (invisible) target box so its center sits on `pos`.
pub fn place_target(document: &web::Document, pos: Vec2, size: f32) {
    if let Some(el) = dom::html_element(document, TARGET_ID) {
        let style = el.style();
        _ = style.set_property("left", &format!("{}px", pos.x));
        _ = style.set_property("top", &format!("{}px", pos.y));
        _ = style.set_property("width", &format!("{size}px"));
        _ = style.set_property("height", &format!("{size}px"));
    }
}

/// Hidden target for a new round.
pub fn reset_target(document: &web::Document) {
    if let Some(el) = dom::html_element(document, TARGET_ID) {
        _ = el.class_list().remove_1(FOUND_CLASS);
        let style = el.style();
        _ = style.set_property("opacity", "0");
        _ = style.set_property("pointer-events", "none");
    }
}

/// Reveal; the image animation itself is left to CSS on `.found`.
pub fn reveal_target(document: &web::Document) {
    if let Some(el) = dom::html_element(document, TARGET_ID) {
        _ = el.class_list().add_1(FOUND_CLASS);
        _ = el.style().set_property("opacity", "1");
    }
}

/// The target only takes clicks inside the reveal radius.
pub fn set_near(document: &web::Document, field_id: &str, near: bool) {
    if let Some(el) = dom::html_element(document, TARGET_ID) {
        _ = el
            .style()
            .set_property("pointer-events", if near { "auto" } else { "none" });
    }
    if let Some(field) = document.get_element_by_id(field_id) {
        _ = field.class_list().toggle_with_force(HOT_CLASS, near);
    }
}
