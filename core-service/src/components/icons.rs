//! Icon names for the player buttons.
//!
//! Names follow the Ionicons set the host renders with. Each slot can be
//! overridden individually; anything not overridden falls back to the
//! default for the player layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Place in a player layout that shows an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconSlot {
    Play,
    Pause,
    SeekForward,
    SeekBackward,
    Next,
    Previous,
    Repeat,
    RepeatOff,
    /// Placeholder artwork shown when the track has none.
    Media,
}

/// Which default table an [`IconSet`] falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconLayout {
    Full,
    Compact,
}

impl IconLayout {
    /// Default icon name for `slot`.
    ///
    /// | slot          | full                         | compact                      |
    /// |---------------|------------------------------|------------------------------|
    /// | play          | `play`                       | `play-outline`               |
    /// | pause         | `pause`                      | `pause-outline`              |
    /// | seek forward  | `play-skip-forward-outline`  | `play-skip-forward-outline`  |
    /// | seek backward | `play-skip-back-outline`     | `play-skip-back-outline`     |
    /// | next          | `play-forward-outline`       | `play-skip-forward-outline`  |
    /// | previous      | `play-back-outline`          | `play-skip-back-outline`     |
    /// | repeat        | `repeat`                     | `repeat`                     |
    /// | repeat off    | `repeat-outline`             | `repeat-outline`             |
    /// | media         | `musical-notes-sharp`        | `musical-notes-sharp`        |
    pub fn default_icon(&self, slot: IconSlot) -> &'static str {
        match (self, slot) {
            (IconLayout::Full, IconSlot::Play) => "play",
            (IconLayout::Full, IconSlot::Pause) => "pause",
            (IconLayout::Compact, IconSlot::Play) => "play-outline",
            (IconLayout::Compact, IconSlot::Pause) => "pause-outline",
            (_, IconSlot::SeekForward) => "play-skip-forward-outline",
            (_, IconSlot::SeekBackward) => "play-skip-back-outline",
            (IconLayout::Full, IconSlot::Next) => "play-forward-outline",
            (IconLayout::Full, IconSlot::Previous) => "play-back-outline",
            (IconLayout::Compact, IconSlot::Next) => "play-skip-forward-outline",
            (IconLayout::Compact, IconSlot::Previous) => "play-skip-back-outline",
            (_, IconSlot::Repeat) => "repeat",
            (_, IconSlot::RepeatOff) => "repeat-outline",
            (_, IconSlot::Media) => "musical-notes-sharp",
        }
    }
}

/// Icon names with per-slot overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSet {
    layout: IconLayout,
    #[serde(default)]
    overrides: BTreeMap<IconSlot, String>,
}

impl IconSet {
    /// Icons of the full player.
    pub fn full() -> Self {
        Self::with_layout(IconLayout::Full)
    }

    /// Icons of the mini player.
    pub fn compact() -> Self {
        Self::with_layout(IconLayout::Compact)
    }

    fn with_layout(layout: IconLayout) -> Self {
        Self {
            layout,
            overrides: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> IconLayout {
        self.layout
    }

    /// Replaces the icon of one slot.
    pub fn with_icon(mut self, slot: IconSlot, name: impl Into<String>) -> Self {
        self.overrides.insert(slot, name.into());
        self
    }

    /// Icon shown for `slot`.
    pub fn icon(&self, slot: IconSlot) -> &str {
        self.overrides
            .get(&slot)
            .map(String::as_str)
            .unwrap_or_else(|| self.layout.default_icon(slot))
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self::full()
    }
}
