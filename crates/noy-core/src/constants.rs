// Shared tuning constants. `GameConfig::default()` is built from these.

// Level scale
pub const LEVEL_COUNT: usize = 6;
pub const BREAKPOINT_COUNT: usize = LEVEL_COUNT - 1;

// Proximity mapping
pub const DEFAULT_MAX_DISTANCE_FACTOR: f32 = 0.75; // fraction of the viewport diagonal
pub const DEFAULT_LEVEL_BREAKPOINTS: [f32; BREAKPOINT_COUNT] = [
    1.0 / 6.0,
    3.4 / 6.0,
    4.5 / 6.0,
    5.2 / 6.0,
    5.7 / 6.0,
];
pub const DEFAULT_VOLUMES: [f32; LEVEL_COUNT] = [0.7, 0.8, 0.9, 0.95, 0.98, 1.0];
pub const DEFAULT_REVEAL_RADIUS: f32 = 15.0; // px

// Playfield
pub const DEFAULT_TARGET_SIZE: f32 = 48.0; // px, hidden target box
pub const DEFAULT_PLAY_MARGIN: f32 = 24.0; // px from viewport edges
pub const DEFAULT_HUD_PADDING: f32 = 12.0; // px below the HUD
pub const TARGET_EDGE_GAP: f32 = 10.0; // px kept between target box and area edge

// Keyboard nudging
pub const KEYBOARD_STEP: f32 = 6.0;
pub const KEYBOARD_STEP_FAST: f32 = 12.0; // with shift held

// Audio graph
pub const MASTER_HEADROOM_GAIN: f32 = 0.7; // leaves room for overlapping ramps
pub const CROSSFADE_SEC: f64 = 0.12;
pub const FLOOR_GAIN: f32 = 0.0001; // never exactly zero
pub const START_DELAY_SEC: f64 = 0.05; // lead time before the first loop starts

// Lookahead scheduler
pub const SCHEDULER_TICK_MS: u32 = 30;
pub const SCHEDULE_HORIZON_SEC: f64 = 0.3;
pub const SCHEDULED_VOICES: usize = 2;
pub const SEGMENT_HISTORY_LEN: usize = 32;
