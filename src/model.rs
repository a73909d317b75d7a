use crate::anim::{AnimState, Clip, Priority};
use crate::timers::{Dialogue, TimerQueue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const SAVE_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Stats {
    pub(crate) health: f32,
    pub(crate) hunger: f32,
    pub(crate) mood: f32,
    pub(crate) hygiene: f32,
    pub(crate) intelligence: f32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 100.0,
            hunger: 80.0,
            mood: 80.0,
            hygiene: 100.0,
            intelligence: 0.0,
        }
    }
}

impl Stats {
    /// Adds every present delta, clamping health/hunger/mood/hygiene to
    /// [0,100] and intelligence to [0,inf).
    pub(crate) fn apply(&mut self, d: &StatDelta) {
        fn bounded(v: &mut f32, d: Option<f32>) {
            if let Some(d) = d {
                *v = (*v + d).clamp(0.0, 100.0);
            }
        }
        bounded(&mut self.health, d.health);
        bounded(&mut self.hunger, d.hunger);
        bounded(&mut self.mood, d.mood);
        bounded(&mut self.hygiene, d.hygiene);
        if let Some(d) = d.intelligence {
            self.intelligence = (self.intelligence + d).max(0.0);
        }
    }
}

/// Partial stat change; absent keys are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct StatDelta {
    pub(crate) health: Option<f32>,
    pub(crate) hunger: Option<f32>,
    pub(crate) mood: Option<f32>,
    pub(crate) hygiene: Option<f32>,
    pub(crate) intelligence: Option<f32>,
}

impl StatDelta {
    pub(crate) fn health(mut self, v: f32) -> Self {
        self.health = Some(v);
        self
    }
    pub(crate) fn hunger(mut self, v: f32) -> Self {
        self.hunger = Some(v);
        self
    }
    pub(crate) fn mood(mut self, v: f32) -> Self {
        self.mood = Some(v);
        self
    }
    pub(crate) fn hygiene(mut self, v: f32) -> Self {
        self.hygiene = Some(v);
        self
    }
    pub(crate) fn intelligence(mut self, v: f32) -> Self {
        self.intelligence = Some(v);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum ActivityKind {
    Work,
    Study,
}

/// A running work or study session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Activity {
    pub(crate) kind: ActivityKind,
    pub(crate) ends_at: DateTime<Utc>,
    pub(crate) duration_secs: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct GameState {
    pub(crate) stats: Stats,
    pub(crate) level: u32,
    pub(crate) exp: u32,
    pub(crate) coins: u32,
    pub(crate) game_minutes: u64,
    pub(crate) is_egg: bool,
    pub(crate) egg_clicks: u32,
    pub(crate) activity: Option<Activity>,
    pub(crate) low_hunger_since: Option<DateTime<Utc>>,
    pub(crate) low_mood_since: Option<DateTime<Utc>>,

    // presentation state, rebuilt on load
    #[serde(skip)]
    pub(crate) anim: AnimState,
    #[serde(skip)]
    pub(crate) dialogue: Dialogue,
    #[serde(skip)]
    pub(crate) timers: TimerQueue,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            stats: Stats::default(),
            level: 1,
            exp: 0,
            coins: 100,
            game_minutes: 0,
            is_egg: true,
            egg_clicks: 0,
            activity: None,
            low_hunger_since: None,
            low_mood_since: None,
            anim: AnimState::new(Clip::Egg, Priority::High, true),
            dialogue: Dialogue::default(),
            timers: TimerQueue::default(),
        }
    }
}

impl GameState {
    pub(crate) fn is_dead(&self) -> bool {
        self.stats.health <= 0.0
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.activity.is_some()
    }

    /// Days since hatching started, counting from day 1.
    pub(crate) fn age_days(&self) -> u64 {
        self.game_minutes / (24 * 60) + 1
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SaveFile {
    pub(crate) version: u32,
    pub(crate) last_seen_utc: DateTime<Utc>,
    pub(crate) state: GameState,
}
