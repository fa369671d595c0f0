//! Shared UI icons and emojis.
//!
//! Common emoji constants used across the terminal output, each with an
//! ASCII fallback for dumb terminals.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// Board indicators
pub static BROOM: Emoji<'_, '_> = Emoji("🧹 ", "");
pub static LIVE: Emoji<'_, '_> = Emoji("📡 ", "[LIVE]");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "[T]");
