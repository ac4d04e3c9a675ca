//! Input contracts for the tour.
//!
//! Adapters translate user interaction (button clicks, key presses, JS calls)
//! into these commands and hand them to `Tour::apply`.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TourCommand {
    Start,
    Advance,
    Retreat,
    AdvanceModule,
    Restart,
    /// Activate the action at `index` on the currently shown panel.
    Activate { index: usize },
}
