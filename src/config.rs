use serde::{Deserialize, Serialize};

use crate::types::{Player, PlayerMode, RuleVariant};

/// Session settings supplied by the host. Every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub variant: RuleVariant,
    pub mode: PlayerMode,
    /// Side played by the heuristic in [`PlayerMode::VersusComputer`].
    pub computer_player: Player,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: RuleVariant::Modern,
            mode: PlayerMode::TwoPlayer,
            computer_player: Player::Second,
        }
    }
}

impl Settings {
    pub fn is_computer(&self, player: Player) -> bool {
        self.mode == PlayerMode::VersusComputer && player == self.computer_player
    }
}
