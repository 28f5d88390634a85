use crossterm::style::Color;

/// Design tokens for the Vigil CLI UI.
///
/// Design constraints:
/// - Only 5 semantic colors (`colors::*`)
/// - All icons and borders must be sourced from this module
pub mod colors {
    use super::Color;

    pub const SECURE: Color = Color::Green;
    pub const VULNERABLE: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const PASS: &str = "✓";
    pub const FAIL: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const UNKNOWN: &str = "○";
    pub const ARROW: &str = "↳";
    pub const BULLET: &str = "●";

    // Section identifiers (used in headers).
    pub const SERVER: &str = "💻";
    pub const DATABASE: &str = "🗄";
    pub const SCAN: &str = "🔍";
    pub const FIX: &str = "🛠";
    pub const WATCH: &str = "⟳";
    pub const REPORT: &str = "📊";
}

pub mod icons_ascii {
    pub const PASS: &str = "[OK]";
    pub const FAIL: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const UNKNOWN: &str = "[??]";
    pub const ARROW: &str = "[>]";
    pub const BULLET: &str = "*";

    pub const SERVER: &str = "[OS]";
    pub const DATABASE: &str = "[DB]";
    pub const SCAN: &str = "[SCAN]";
    pub const FIX: &str = "[FIX]";
    pub const WATCH: &str = "[~]";
    pub const REPORT: &str = "[REPORT]";
}

pub mod borders {
    pub const TOP_LEFT: &str = "╭";
    pub const TOP_RIGHT: &str = "╮";
    pub const BOTTOM_LEFT: &str = "╰";
    pub const BOTTOM_RIGHT: &str = "╯";
    pub const HORIZONTAL: &str = "─";
    pub const VERTICAL: &str = "│";
}

pub mod borders_ascii {
    pub const TOP_LEFT: &str = "+";
    pub const TOP_RIGHT: &str = "+";
    pub const BOTTOM_LEFT: &str = "+";
    pub const BOTTOM_RIGHT: &str = "+";
    pub const HORIZONTAL: &str = "-";
    pub const VERTICAL: &str = "|";
}
