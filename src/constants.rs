//! Shared UI constants such as colors, panel sizing, and editor thresholds.

pub const BG_DEEPEST: &str = "#09090b";
pub const BG_BASE: &str = "#0a0a0b";
pub const BG_ELEVATED: &str = "#141414";
pub const BG_SURFACE: &str = "#1a1a1a";
pub const BG_HOVER: &str = "#262626";

pub const BORDER_SUBTLE: &str = "#1f1f1f";
pub const BORDER_DEFAULT: &str = "#27272a";
pub const BORDER_STRONG: &str = "#3f3f46";
pub const BORDER_ACCENT: &str = "#3b82f6";

pub const TEXT_PRIMARY: &str = "#fafafa";
pub const TEXT_SECONDARY: &str = "#a1a1aa";
pub const TEXT_MUTED: &str = "#71717a";
pub const TEXT_DIM: &str = "#52525b";

pub const ACCENT_SEGMENT: &str = "#3b82f6";
pub const ACCENT_PLAYBACK: &str = "#22c55e";
pub const ACCENT_HIDDEN: &str = "#f97316";

// Panel dimensions
pub const PANEL_DEFAULT_WIDTH: f64 = 260.0;
pub const SEGMENT_STRIP_HEIGHT: f64 = 180.0;

// Editor thresholds. The two snap thresholds live in different coordinate
// spaces (viewport pixels vs. image-relative percent) and stay separate.
pub const EDGE_SNAP_THRESHOLD_PCT: f64 = 1.5;
pub const PAN_SNAP_THRESHOLD_PX: f64 = 24.0;

// Playback
pub const PLAYBACK_TICK_INTERVAL_MS: u64 = 16;
pub const COUNTDOWN_BEEP_HZ: f32 = 880.0;
pub const COUNTDOWN_BEEP_SECONDS: f32 = 0.12;
/// Delay before the player's control overlay auto-hides, milliseconds.
pub const CONTROLS_HIDE_DELAY_MS: u64 = 2500;
/// Decay for the transient snap-indicator overlay, milliseconds.
pub const SNAP_INDICATOR_DECAY_MS: u64 = 600;
