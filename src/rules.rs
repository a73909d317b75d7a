use crate::anim::Clip;
use crate::model::StatDelta;
use serde::{Deserialize, Serialize};

/// Game tuning table. One tick stands for 12 in-game minutes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Rules {
    pub(crate) tick_interval_ms: u64,
    pub(crate) dialogue_ms: i64,
    pub(crate) clip_reset_ms: i64,
    pub(crate) game_minutes_per_tick: u64,
    pub(crate) session_minutes_per_sec: f32,

    pub(crate) max_exp: u32,
    pub(crate) egg_clicks_to_hatch: u32,

    pub(crate) hunger_decay: f32,
    pub(crate) hygiene_decay: f32,
    pub(crate) mood_decay: f32,

    pub(crate) low_hunger_threshold: f32,
    pub(crate) low_hunger_grace_mins: i64,
    pub(crate) low_hunger_penalty: f32,
    pub(crate) low_mood_threshold: f32,
    pub(crate) low_mood_grace_mins: i64,
    pub(crate) low_mood_penalty: f32,

    pub(crate) sick_below: f32,
    pub(crate) hungry_below: f32,
    pub(crate) itchy_below: f32,

    pub(crate) flavor_clip_chance: f64,
    pub(crate) flavor_talk_chance: f64,
    pub(crate) busy_talk_chance: f64,

    pub(crate) work_min_level: u32,
    pub(crate) work_min_intelligence: f32,
    pub(crate) work_min_hunger: f32,
    pub(crate) work_min_health: f32,
    pub(crate) study_min_hunger: f32,

    pub(crate) wage_per_hour: f32,
    pub(crate) work_exp_per_hour: f32,
    pub(crate) work_hunger_per_hour: f32,
    pub(crate) work_mood_per_hour: f32,
    pub(crate) tuition_per_hour: f32,
    pub(crate) study_intel_per_hour: f32,
    pub(crate) study_exp_per_hour: f32,
    pub(crate) study_hunger_per_hour: f32,

    pub(crate) clean_cost: u32,
    pub(crate) duel_prize: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10_000,
            dialogue_ms: 4_000,
            clip_reset_ms: 5_000,
            game_minutes_per_tick: 12,
            session_minutes_per_sec: 12.0,

            max_exp: 100,
            egg_clicks_to_hatch: 10,

            hunger_decay: 1.0,
            hygiene_decay: 0.4,
            mood_decay: 1.0,

            low_hunger_threshold: 20.0,
            low_hunger_grace_mins: 30,
            low_hunger_penalty: 0.5,
            low_mood_threshold: 20.0,
            low_mood_grace_mins: 60,
            low_mood_penalty: 0.2,

            sick_below: 40.0,
            hungry_below: 20.0,
            itchy_below: 30.0,

            flavor_clip_chance: 0.1,
            flavor_talk_chance: 0.3,
            busy_talk_chance: 0.1,

            work_min_level: 3,
            work_min_intelligence: 30.0,
            work_min_hunger: 30.0,
            work_min_health: 40.0,
            study_min_hunger: 30.0,

            wage_per_hour: 15.0,
            work_exp_per_hour: 5.0,
            work_hunger_per_hour: 5.0,
            work_mood_per_hour: 5.0,
            tuition_per_hour: 5.0,
            study_intel_per_hour: 2.0,
            study_exp_per_hour: 3.0,
            study_hunger_per_hour: 3.0,

            clean_cost: 20,
            duel_prize: 20,
        }
    }
}

impl Rules {
    /// In-game hours covered by a session of `secs` real seconds. Sessions
    /// run on their own clock of `session_minutes_per_sec`.
    pub(crate) fn game_hours(&self, secs: u32) -> f32 {
        secs as f32 * self.session_minutes_per_sec / 60.0
    }

    pub(crate) fn tuition(&self, secs: u32) -> u32 {
        (self.tuition_per_hour * self.game_hours(secs)).ceil() as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Food {
    Snack,
    Meal,
    Feast,
    Water,
    Coffee,
    Drink,
}

impl Food {
    pub(crate) const ALL: [Food; 6] = [
        Food::Snack,
        Food::Meal,
        Food::Feast,
        Food::Water,
        Food::Coffee,
        Food::Drink,
    ];

    pub(crate) fn cost(self) -> u32 {
        match self {
            Food::Snack => 10,
            Food::Meal => 30,
            Food::Feast => 100,
            Food::Water => 0,
            Food::Coffee => 15,
            Food::Drink => 5,
        }
    }

    pub(crate) fn delta(self) -> StatDelta {
        let (hunger, mood) = match self {
            Food::Snack => (10.0, 2.0),
            Food::Meal => (40.0, 5.0),
            Food::Feast => (100.0, 20.0),
            Food::Water => (0.0, 0.0),
            Food::Coffee => (0.0, 5.0),
            Food::Drink => (5.0, 2.0),
        };
        StatDelta::default().hunger(hunger).mood(mood)
    }

    pub(crate) fn clip(self) -> Clip {
        match self {
            Food::Snack => Clip::Snack,
            Food::Meal => Clip::FastFood,
            Food::Feast => Clip::Feast,
            Food::Water => Clip::Water,
            Food::Coffee => Clip::Coffee,
            Food::Drink => Clip::ColdDrink,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Food::Snack => "snack",
            Food::Meal => "meal",
            Food::Feast => "feast",
            Food::Water => "water",
            Food::Coffee => "coffee",
            Food::Drink => "cold drink",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Treatment {
    Shot,
    Pill,
    Surgery,
}

impl Treatment {
    pub(crate) const ALL: [Treatment; 3] = [Treatment::Shot, Treatment::Pill, Treatment::Surgery];

    pub(crate) fn cost(self) -> u32 {
        match self {
            Treatment::Shot => 200,
            Treatment::Pill => 100,
            Treatment::Surgery => 1000,
        }
    }

    pub(crate) fn health(self) -> f32 {
        match self {
            Treatment::Shot => 30.0,
            Treatment::Pill => 15.0,
            Treatment::Surgery => 100.0,
        }
    }

    pub(crate) fn clip(self) -> Clip {
        match self {
            Treatment::Shot => Clip::Shot,
            Treatment::Pill => Clip::Pill,
            Treatment::Surgery => Clip::Surgery,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Treatment::Shot => "shot",
            Treatment::Pill => "pill",
            Treatment::Surgery => "surgery",
        }
    }
}

/// Rock/paper/scissors hands for the duel mini game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub(crate) const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub(crate) fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Paper, Hand::Rock) | (Hand::Scissors, Hand::Paper)
        )
    }
}

/// Session lengths offered by the work and study menus, in real seconds.
/// At 12 game minutes per second these are 0.2 to 0.6 game hours.
pub(crate) const SESSION_CHOICES: [u32; 3] = [1, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_seconds_is_two_game_hours() {
        let r = Rules::default();
        assert_eq!(r.game_hours(10), 2.0);
        assert_eq!(r.tuition(10), 10);
        assert_eq!(r.tuition(1), 1);
    }

    #[test]
    fn menu_sessions_are_short_shifts() {
        let r = Rules::default();
        let hours: Vec<f32> = SESSION_CHOICES.iter().map(|s| r.game_hours(*s)).collect();
        for (h, want) in hours.iter().zip([0.2, 0.4, 0.6]) {
            assert!((h - want).abs() < 1e-5);
        }
        let tuition: Vec<u32> = SESSION_CHOICES.iter().map(|s| r.tuition(*s)).collect();
        assert_eq!(tuition, vec![1, 2, 3]);
        // the longest shift at the minimum intelligence earns a few coins, not hundreds
        let pay = (r.wage_per_hour * hours[2] * 130.0 / 100.0).floor();
        assert_eq!(pay, 11.0);
    }

    #[test]
    fn hands_beat_exactly_one_other() {
        for a in Hand::ALL {
            let wins = Hand::ALL.iter().filter(|b| a.beats(**b)).count();
            assert_eq!(wins, 1);
            assert!(!a.beats(a));
        }
    }
}
