use crate::anim::{Clip, Priority, FLAVOR_CLIPS, RETURN_CLIPS};
use crate::dice::{choose, Dice};
use crate::error::Refusal;
use crate::model::{Activity, ActivityKind, GameState, StatDelta};
use crate::rules::{Food, Hand, Rules, Treatment};
use chrono::{DateTime, Duration as ChronoDuration, Utc};

const FLAVOR_TALK: [&str; 4] = [
    "What lovely weather today~",
    "What are you up to?",
    "So bored...",
    "Hehe~",
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerAction {
    ClickEgg,
    Feed(Food),
    Clean,
    Play,
    Treat(Treatment),
    StartWork(u32),
    StartStudy(u32),
    CancelWork,
    Duel(Hand),
    NewGame,
}

/// What a finished work or study session paid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Payout {
    pub(crate) coins: u32,
    pub(crate) exp: u32,
    pub(crate) intelligence: f32,
}

impl GameState {
    pub(crate) fn apply(
        &mut self,
        action: PlayerAction,
        rules: &Rules,
        now: DateTime<Utc>,
        dice: &mut dyn Dice,
    ) -> Result<(), Refusal> {
        match action {
            PlayerAction::ClickEgg => self.click_egg(rules, now),
            PlayerAction::Feed(food) => self.feed(food, rules, now),
            PlayerAction::Clean => self.clean(rules, now),
            PlayerAction::Play => self.play(rules, now),
            PlayerAction::Treat(t) => self.treat(t, rules, now),
            PlayerAction::StartWork(secs) => self.start_work(secs, rules, now),
            PlayerAction::StartStudy(secs) => self.start_study(secs, rules, now),
            PlayerAction::CancelWork => self.cancel_work(rules, now, dice),
            PlayerAction::Duel(hand) => self.duel(hand, rules, now, dice),
            PlayerAction::NewGame => {
                tracing::info!("new game");
                *self = GameState::default();
                Ok(())
            }
        }
    }

    fn ensure_hatched(&self) -> Result<(), Refusal> {
        if self.is_dead() {
            return Err(Refusal::Dead);
        }
        if self.is_egg {
            return Err(Refusal::Egg);
        }
        Ok(())
    }

    fn ensure_free(&mut self, rules: &Rules, now: DateTime<Utc>) -> Result<(), Refusal> {
        self.ensure_hatched()?;
        if self.is_busy() {
            self.show_dialogue("I'm busy right now, can't do that!", rules, now);
            return Err(Refusal::Busy);
        }
        Ok(())
    }

    pub(crate) fn click_egg(&mut self, rules: &Rules, now: DateTime<Utc>) -> Result<(), Refusal> {
        if !self.is_egg {
            return Err(Refusal::NotAnEgg);
        }
        self.egg_clicks += 1;
        if self.egg_clicks >= rules.egg_clicks_to_hatch {
            self.is_egg = false;
            self.egg_clicks = 0;
            tracing::info!("egg hatched");
            self.set_animation(Clip::Egg, Priority::High, false, rules, now);
            self.show_dialogue("Wow! I finally get to meet you! I love you already~", rules, now);
        }
        Ok(())
    }

    pub(crate) fn feed(&mut self, food: Food, rules: &Rules, now: DateTime<Utc>) -> Result<(), Refusal> {
        self.ensure_free(rules, now)?;
        if food.cost() > 0 {
            self.spend_coins(food.cost(), rules, now)?;
        }
        self.update_stats(food.delta());
        self.add_exp(2, rules, now);
        self.set_animation(food.clip(), Priority::Medium, false, rules, now);
        self.show_dialogue("Yum! That was delicious, thank you~", rules, now);
        tracing::debug!(food = food.name(), coins = self.coins, "fed");
        Ok(())
    }

    pub(crate) fn clean(&mut self, rules: &Rules, now: DateTime<Utc>) -> Result<(), Refusal> {
        self.ensure_free(rules, now)?;
        self.spend_coins(rules.clean_cost, rules, now)?;
        self.update_stats(StatDelta::default().hygiene(100.0).mood(5.0));
        self.add_exp(5, rules, now);
        self.set_animation(Clip::Bath, Priority::Medium, false, rules, now);
        self.show_dialogue("Bath time was great! I smell so nice~", rules, now);
        Ok(())
    }

    pub(crate) fn play(&mut self, rules: &Rules, now: DateTime<Utc>) -> Result<(), Refusal> {
        self.ensure_free(rules, now)?;
        self.update_stats(StatDelta::default().mood(5.0).hunger(-5.0));
        self.add_exp(5, rules, now);
        self.set_animation(Clip::Play, Priority::Medium, false, rules, now);
        self.show_dialogue("Hehe! Playing with you is the best!", rules, now);
        Ok(())
    }

    pub(crate) fn treat(
        &mut self,
        treatment: Treatment,
        rules: &Rules,
        now: DateTime<Utc>,
    ) -> Result<(), Refusal> {
        if self.is_dead() {
            self.show_dialogue("It's gone... only a resurrection potion could help now.", rules, now);
            return Err(Refusal::Dead);
        }
        self.ensure_free(rules, now)?;
        self.spend_coins(treatment.cost(), rules, now)?;
        self.update_stats(StatDelta::default().health(treatment.health()).mood(-5.0));
        self.set_animation(treatment.clip(), Priority::Medium, false, rules, now);
        self.show_dialogue("I feel much better! Thanks for looking after me~", rules, now);
        tracing::debug!(treatment = treatment.name(), health = self.stats.health, "treated");
        Ok(())
    }

    pub(crate) fn start_work(&mut self, secs: u32, rules: &Rules, now: DateTime<Utc>) -> Result<(), Refusal> {
        self.ensure_hatched()?;
        if self.level < rules.work_min_level {
            self.show_dialogue(
                format!("I need to reach level {} before I can work!", rules.work_min_level),
                rules,
                now,
            );
            return Err(Refusal::LevelTooLow {
                need: rules.work_min_level,
                have: self.level,
            });
        }
        if self.stats.intelligence < rules.work_min_intelligence {
            self.show_dialogue(
                format!(
                    "I need {} intelligence before anyone will hire me!",
                    rules.work_min_intelligence
                ),
                rules,
                now,
            );
            return Err(Refusal::NotSmartEnough {
                need: rules.work_min_intelligence,
            });
        }
        if self.stats.hunger < rules.work_min_hunger {
            self.show_dialogue("Too hungry to work...", rules, now);
            return Err(Refusal::TooHungry);
        }
        if self.stats.health < rules.work_min_health {
            self.show_dialogue("I don't feel well... can I rest a bit?", rules, now);
            return Err(Refusal::TooSick);
        }
        self.begin_activity(ActivityKind::Work, secs, rules, now);
        self.show_dialogue(
            format!("Off to work hard for our home! ({secs}s)"),
            rules,
            now,
        );
        Ok(())
    }

    pub(crate) fn start_study(&mut self, secs: u32, rules: &Rules, now: DateTime<Utc>) -> Result<(), Refusal> {
        self.ensure_hatched()?;
        if self.stats.hunger < rules.study_min_hunger {
            self.show_dialogue("So hungry I can't read a single line...", rules, now);
            return Err(Refusal::TooHungry);
        }
        let tuition = rules.tuition(secs);
        if self.coins < tuition {
            self.show_dialogue(
                format!("Can't afford the tuition... (need {tuition} coins)"),
                rules,
                now,
            );
            return Err(Refusal::NotEnoughCoins {
                need: tuition,
                have: self.coins,
            });
        }
        self.spend_coins(tuition, rules, now)?;
        self.begin_activity(ActivityKind::Study, secs, rules, now);
        self.show_dialogue(
            format!("Off to study and get smarter! ({secs}s)"),
            rules,
            now,
        );
        Ok(())
    }

    /// Starting a session while another runs replaces it; the old one pays nothing.
    fn begin_activity(&mut self, kind: ActivityKind, secs: u32, rules: &Rules, now: DateTime<Utc>) {
        if let Some(old) = self.activity {
            tracing::info!(kind = ?old.kind, "activity replaced");
        }
        self.activity = Some(Activity {
            kind,
            ends_at: now + ChronoDuration::seconds(i64::from(secs)),
            duration_secs: secs,
        });
        tracing::info!(?kind, secs, "activity started");
        self.set_animation(Clip::Exit, Priority::Max, false, rules, now);
    }

    /// Ends the running session early. Nothing is paid out.
    pub(crate) fn cancel_work(
        &mut self,
        rules: &Rules,
        now: DateTime<Utc>,
        dice: &mut dyn Dice,
    ) -> Result<(), Refusal> {
        let Some(activity) = self.activity.take() else {
            return Ok(());
        };
        tracing::info!(kind = ?activity.kind, "activity cancelled");
        self.yield_animation();
        self.set_animation(choose(dice, &RETURN_CLIPS), Priority::High, false, rules, now);
        Ok(())
    }

    pub(crate) fn duel(
        &mut self,
        hand: Hand,
        rules: &Rules,
        now: DateTime<Utc>,
        dice: &mut dyn Dice,
    ) -> Result<(), Refusal> {
        self.ensure_free(rules, now)?;
        let theirs = choose(dice, &Hand::ALL);
        if hand.beats(theirs) {
            self.add_coins(rules.duel_prize);
            self.update_stats(StatDelta::default().mood(10.0));
            self.show_dialogue(
                format!("Yay, you won! (+{} coins)", rules.duel_prize),
                rules,
                now,
            );
        } else if theirs.beats(hand) {
            self.update_stats(StatDelta::default().mood(-5.0));
            self.show_dialogue("Boo... I lost...", rules, now);
        } else {
            self.show_dialogue("A draw! Again?", rules, now);
        }
        tracing::debug!(?hand, ?theirs, "duel");
        Ok(())
    }

    /// Pays out a session whose end time has passed and clears it. Returns
    /// `None` when nothing is running or it is not over yet, so a second
    /// call for the same session pays nothing.
    pub(crate) fn resolve_activity(
        &mut self,
        rules: &Rules,
        now: DateTime<Utc>,
        dice: &mut dyn Dice,
    ) -> Option<Payout> {
        let activity = self.activity.filter(|a| now >= a.ends_at)?;
        self.activity = None;

        let hours = rules.game_hours(activity.duration_secs);
        let payout = match activity.kind {
            ActivityKind::Work => Payout {
                // every intelligence point adds 1% to the wage
                coins: (rules.wage_per_hour * hours * (100.0 + self.stats.intelligence) / 100.0)
                    .floor() as u32,
                exp: (rules.work_exp_per_hour * hours).ceil() as u32,
                intelligence: 0.0,
            },
            ActivityKind::Study => Payout {
                coins: 0,
                exp: (rules.study_exp_per_hour * hours).ceil() as u32,
                intelligence: (rules.study_intel_per_hour * hours).ceil(),
            },
        };
        let cost = match activity.kind {
            ActivityKind::Work => StatDelta::default()
                .hunger(-rules.work_hunger_per_hour * hours)
                .mood(-rules.work_mood_per_hour * hours),
            ActivityKind::Study => StatDelta::default()
                .hunger(-rules.study_hunger_per_hour * hours)
                .intelligence(payout.intelligence),
        };

        self.add_coins(payout.coins);
        self.add_exp(payout.exp, rules, now);
        self.update_stats(cost);
        tracing::info!(kind = ?activity.kind, ?payout, "activity finished");

        self.yield_animation();
        self.set_animation(choose(dice, &RETURN_CLIPS), Priority::High, false, rules, now);
        match activity.kind {
            ActivityKind::Work => self.show_dialogue(
                format!("I'm back! Earned {} coins, not bad right?", payout.coins),
                rules,
                now,
            ),
            ActivityKind::Study => self.show_dialogue(
                format!(
                    "Done studying! I feel smarter! (intelligence +{})",
                    payout.intelligence
                ),
                rules,
                now,
            ),
        }
        Some(payout)
    }

    /// One scheduler step.
    pub(crate) fn tick(&mut self, rules: &Rules, now: DateTime<Utc>, dice: &mut dyn Dice) {
        if self.is_egg {
            return;
        }

        if self.is_dead() {
            if self.anim.clip != Clip::Tombstone {
                tracing::warn!(age_days = self.age_days(), "pet died");
                self.set_animation(Clip::Tombstone, Priority::Max, true, rules, now);
                self.show_dialogue("...", rules, now);
            }
            return;
        }

        self.game_minutes += rules.game_minutes_per_tick;

        if let Some(activity) = self.activity {
            if now >= activity.ends_at {
                self.resolve_activity(rules, now, dice);
            } else if dice.roll(rules.busy_talk_chance) {
                let line = match activity.kind {
                    ActivityKind::Work => "Huff, puff... working hard!",
                    ActivityKind::Study => "Study hard, improve every day...",
                };
                self.show_dialogue(line, rules, now);
            }
            return;
        }

        let before = self.stats;
        self.update_stats(
            StatDelta::default()
                .hunger(-rules.hunger_decay)
                .hygiene(-rules.hygiene_decay)
                .mood(-rules.mood_decay),
        );

        let mut health_drop = 0.0;
        if sustained_low(
            &mut self.low_hunger_since,
            before.hunger < rules.low_hunger_threshold,
            rules.low_hunger_grace_mins,
            now,
        ) {
            health_drop += rules.low_hunger_penalty;
        }
        if sustained_low(
            &mut self.low_mood_since,
            before.mood < rules.low_mood_threshold,
            rules.low_mood_grace_mins,
            now,
        ) {
            health_drop += rules.low_mood_penalty;
        }
        if health_drop > 0.0 {
            self.update_stats(StatDelta::default().health(-health_drop));
            tracing::debug!(health = self.stats.health, "neglect penalty");
        }

        if self.anim.priority == Priority::Idle && dice.roll(rules.flavor_clip_chance) {
            self.set_animation(choose(dice, &FLAVOR_CLIPS), Priority::Low, false, rules, now);
            if dice.roll(rules.flavor_talk_chance) {
                self.show_dialogue(choose(dice, &FLAVOR_TALK), rules, now);
            }
        }

        if self.anim.priority <= Priority::Idle || self.anim.clip.is_condition() {
            self.reset_animation(rules, now);
        }
    }
}

/// Tracks how long a stat has been below its threshold. True once it has
/// stayed low for longer than `grace_mins`; recovering clears the timer.
fn sustained_low(
    since: &mut Option<DateTime<Utc>>,
    is_low: bool,
    grace_mins: i64,
    now: DateTime<Utc>,
) -> bool {
    if !is_low {
        *since = None;
        return false;
    }
    match *since {
        None => {
            *since = Some(now);
            false
        }
        Some(start) => now - start > ChronoDuration::minutes(grace_mins),
    }
}
