pub mod keyboard;
pub mod pointer;

pub use keyboard::wire_global_keydown;
pub use pointer::{wire_buttons, wire_field, wire_resize};
