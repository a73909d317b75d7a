use crate::anim::{Clip, Priority};
use crate::error::Refusal;
use crate::model::{GameState, StatDelta};
use crate::rules::Rules;
use chrono::{DateTime, Utc};

impl GameState {
    pub(crate) fn update_stats(&mut self, delta: StatDelta) {
        self.stats.apply(&delta);
    }

    /// Adds experience. Crossing `max_exp` levels up once per call, even
    /// when `amount` would cover several levels.
    pub(crate) fn add_exp(&mut self, amount: u32, rules: &Rules, now: DateTime<Utc>) {
        let total = self.exp.saturating_add(amount);
        if total < rules.max_exp {
            self.exp = total;
            return;
        }
        self.exp = total - rules.max_exp;
        self.level += 1;
        tracing::info!(level = self.level, "level up");
        self.set_animation(Clip::LevelUp, Priority::High, false, rules, now);
        self.show_dialogue("Level up! I feel so powerful!", rules, now);
    }

    pub(crate) fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub(crate) fn spend_coins(
        &mut self,
        amount: u32,
        rules: &Rules,
        now: DateTime<Utc>,
    ) -> Result<(), Refusal> {
        if self.coins >= amount {
            self.coins -= amount;
            return Ok(());
        }
        self.show_dialogue(
            "Not enough coins... maybe I should go find a job?",
            rules,
            now,
        );
        Err(Refusal::NotEnoughCoins {
            need: amount,
            have: self.coins,
        })
    }
}
