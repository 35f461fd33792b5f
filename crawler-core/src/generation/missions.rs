//! Portal missions offered in the menu.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Rank, Theme};
use crate::constants::MISSIONS_PER_BATCH;
use crate::monster::BossId;

/// One gate the player can enter from the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalMission {
    pub id: u64,
    pub rank: Rank,
    pub theme: Theme,
    /// Seconds before the run fails by timeout
    pub time_limit: f32,
    /// Boss hp/damage multiplier
    pub difficulty: u32,
    pub description: String,
    pub enemy_count: u32,
    pub boss: BossId,
}

/// Generate a batch of missions tuned to the player's level.
///
/// `next_id` supplies mission ids so they never collide across batches.
pub fn generate_missions<R: Rng + ?Sized>(
    player_level: u32,
    rng: &mut R,
    mut next_id: impl FnMut() -> u64,
) -> Vec<PortalMission> {
    let level = player_level.max(1);
    let base_rank = ((level - 1) / 10) as i64;
    let base_difficulty = level.div_ceil(5);

    (0..MISSIONS_PER_BATCH)
        .map(|_| {
            let rank_index = (base_rank + rng.gen_range(-1..=1)).clamp(0, 5) as usize;
            let rank = Rank::from_index(rank_index);
            let theme = Theme::ALL[rng.gen_range(0..Theme::ALL.len())];
            PortalMission {
                id: next_id(),
                rank,
                theme,
                time_limit: rng.gen_range(300.0..600.0),
                difficulty: base_difficulty + rng.gen_range(0..=1),
                description: format!("Clear the {}-Rank Gate", rank.letter()),
                enemy_count: rng.gen_range(20..40),
                boss: BossId::for_theme(theme),
            }
        })
        .collect()
}
