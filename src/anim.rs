use crate::model::GameState;
use crate::rules::Rules;
use crate::timers::Deferred;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// Clip priority; a request preempts the current clip when its priority is
/// at least as high.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Priority {
    Idle = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Max = 4,
}

/// Pre-made animation clips the front end knows how to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Clip {
    Egg,
    LevelUp,

    Idle,
    Scratch,
    LookDownLeft,
    LookUpLeft,
    Play,
    Nod,
    Shake,
    Shy,
    Kiss,
    Hand,

    Sick,
    Hungry,
    Itchy,

    Snack,
    FastFood,
    Feast,
    Water,
    Coffee,
    ColdDrink,
    Bath,

    Shot,
    Pill,
    Surgery,

    Tombstone,

    Enter1,
    Enter2,
    Enter3,
    Exit,
    Hidden,
}

pub(crate) const FLAVOR_CLIPS: [Clip; 9] = [
    Clip::Scratch,
    Clip::LookDownLeft,
    Clip::LookUpLeft,
    Clip::Play,
    Clip::Nod,
    Clip::Shake,
    Clip::Shy,
    Clip::Kiss,
    Clip::Hand,
];

pub(crate) const RETURN_CLIPS: [Clip; 3] = [Clip::Enter1, Clip::Enter2, Clip::Enter3];

impl Clip {
    /// Looping clips that mirror a low stat rather than an action.
    pub(crate) fn is_condition(self) -> bool {
        matches!(self, Clip::Sick | Clip::Hungry | Clip::Itchy)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Clip::Egg => "egg",
            Clip::LevelUp => "level up!",
            Clip::Idle => "blinking",
            Clip::Scratch => "scratching its back",
            Clip::LookDownLeft | Clip::LookUpLeft => "looking around",
            Clip::Play => "playing",
            Clip::Nod => "nodding",
            Clip::Shake => "shaking its head",
            Clip::Shy => "feeling shy",
            Clip::Kiss => "blowing a kiss",
            Clip::Hand => "reaching out",
            Clip::Sick => "shivering, sick",
            Clip::Hungry => "stomach growling",
            Clip::Itchy => "itchy all over",
            Clip::Snack => "munching a snack",
            Clip::FastFood => "eating fast food",
            Clip::Feast => "having a feast",
            Clip::Water => "drinking water",
            Clip::Coffee => "sipping coffee",
            Clip::ColdDrink => "slurping a cold drink",
            Clip::Bath => "taking a bath",
            Clip::Shot => "getting a shot",
            Clip::Pill => "swallowing a pill",
            Clip::Surgery => "in surgery",
            Clip::Tombstone => "tombstone",
            Clip::Enter1 | Clip::Enter2 | Clip::Enter3 => "coming home",
            Clip::Exit => "heading out",
            Clip::Hidden => "away",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AnimState {
    pub(crate) clip: Clip,
    pub(crate) priority: Priority,
    pub(crate) looping: bool,
    /// Bumped on every applied change; deferred auto-resets carry the epoch
    /// they were scheduled under.
    pub(crate) epoch: u64,
}

impl AnimState {
    pub(crate) fn new(clip: Clip, priority: Priority, looping: bool) -> Self {
        Self {
            clip,
            priority,
            looping,
            epoch: 0,
        }
    }

    pub(crate) fn admits(&self, clip: Clip, priority: Priority) -> bool {
        priority >= self.priority || clip == self.clip
    }
}

impl Default for AnimState {
    fn default() -> Self {
        Self::new(Clip::Idle, Priority::Idle, true)
    }
}

impl GameState {
    /// Requests `clip`. Applied only if the arbiter admits it; returns
    /// whether it was. One-shot clips schedule their own auto-reset.
    pub(crate) fn set_animation(
        &mut self,
        clip: Clip,
        priority: Priority,
        looping: bool,
        rules: &Rules,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.anim.admits(clip, priority) {
            tracing::trace!(?clip, ?priority, current = ?self.anim.clip, "clip request dropped");
            return false;
        }
        self.assign_animation(clip, priority, looping);
        if !looping {
            self.timers.schedule(
                now + ChronoDuration::milliseconds(rules.clip_reset_ms),
                Deferred::ResetAnimation {
                    epoch: self.anim.epoch,
                },
            );
        }
        true
    }

    /// Lowers the current priority to Idle without changing the clip, so the
    /// next request of any priority is admitted.
    pub(crate) fn yield_animation(&mut self) {
        self.anim.priority = Priority::Idle;
    }

    fn assign_animation(&mut self, clip: Clip, priority: Priority, looping: bool) {
        self.anim.clip = clip;
        self.anim.priority = priority;
        self.anim.looping = looping;
        self.anim.epoch = self.anim.epoch.wrapping_add(1);
    }

    /// Picks the resting clip for the current snapshot: hidden while away,
    /// then sick, hungry, itchy, idle. First match wins.
    pub(crate) fn reset_animation(&mut self, rules: &Rules, now: DateTime<Utc>) {
        if self.is_egg {
            return;
        }

        let (clip, priority, complaint) = if self.activity.is_some() {
            (Clip::Hidden, Priority::Max, None)
        } else if self.stats.health < rules.sick_below {
            (
                Clip::Sick,
                Priority::High,
                Some("Ugh... my head is spinning. I don't feel well..."),
            )
        } else if self.stats.hunger < rules.hungry_below {
            (
                Clip::Hungry,
                Priority::High,
                Some("My tummy is rumbling... can I have something yummy?"),
            )
        } else if self.stats.hygiene < rules.itchy_below {
            (
                Clip::Itchy,
                Priority::High,
                Some("I feel all itchy. I want a nice warm bath~"),
            )
        } else {
            (Clip::Idle, Priority::Idle, None)
        };

        let changed = self.anim.clip != clip;
        self.assign_animation(clip, priority, true);
        if let (true, Some(text)) = (changed, complaint) {
            self.show_dialogue(text, rules, now);
        }
    }
}
