//! Battle phases and the commands that move between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{MoveId, UnitId};

/// Where a battle stands.
///
/// ```text
/// Deployment -> Reveal -> Selection -> Execution -> Deployment | Victory | Defeat
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Waiting for the player to send a living unit forward.
    Deployment,
    /// Both active units are known; waiting for the reveal to finish.
    Reveal {
        /// Player's active unit.
        player: UnitId,
        /// Opponent's active unit.
        enemy: UnitId,
    },
    /// Waiting for the player's move.
    Selection {
        /// Player's active unit.
        player: UnitId,
        /// Opponent's active unit.
        enemy: UnitId,
    },
    /// Both moves are locked in; waiting for the round to resolve.
    Execution {
        /// Player's active unit.
        player: UnitId,
        /// Opponent's active unit.
        enemy: UnitId,
        /// Move chosen by the player.
        player_move: MoveId,
        /// Move chosen for the opponent.
        enemy_move: MoveId,
    },
    /// The opponent's team is wiped out.
    Victory,
    /// The player's team is wiped out.
    Defeat,
}

impl BattlePhase {
    /// Whether the battle is over.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }

    /// Short phase name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::Reveal { .. } => "reveal",
            Self::Selection { .. } => "selection",
            Self::Execution { .. } => "execution",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        }
    }

    /// Active units, if any are deployed.
    #[must_use]
    pub const fn combatants(&self) -> Option<(&UnitId, &UnitId)> {
        match self {
            Self::Reveal { player, enemy }
            | Self::Selection { player, enemy }
            | Self::Execution { player, enemy, .. } => Some((player, enemy)),
            Self::Deployment | Self::Victory | Self::Defeat => None,
        }
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Player input to a battle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleCommand {
    /// Send a unit forward. Valid in [`BattlePhase::Deployment`].
    Deploy(UnitId),
    /// End the reveal. Valid in [`BattlePhase::Reveal`].
    FinishReveal,
    /// Pick a move. Valid in [`BattlePhase::Selection`].
    SelectMove(MoveId),
    /// Resolve the locked-in round. Valid in [`BattlePhase::Execution`].
    ResolveRound,
}

impl BattleCommand {
    /// Short command name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Deploy(_) => "deploy",
            Self::FinishReveal => "finish reveal",
            Self::SelectMove(_) => "select move",
            Self::ResolveRound => "resolve round",
        }
    }
}
