/// Element ids and resource paths the page is expected to provide.
///
/// Tuning numbers live in `noy_core::constants`; this file only names the
/// DOM contract.
pub const FIELD_ID: &str = "field";
pub const HUD_ID: &str = "hud";
pub const TARGET_ID: &str = "target";
pub const START_BUTTON_ID: &str = "startButton";
pub const RESTART_BUTTON_ID: &str = "restartBtn";
pub const MSG_ID: &str = "msg";

// Optional overrides for `GameConfig`, served next to the page
pub const CONFIG_URL: &str = "config.json";

pub const MSG_SEEK: &str = "Move around to find the hidden Noy.";
pub const MSG_FOUND: &str = "You found Noy!";

// Classes toggled on the field and target
pub const HIDDEN_CLASS: &str = "hidden";
pub const FOUND_CLASS: &str = "found";
pub const HOT_CLASS: &str = "hot";
