use crate::model::GameState;
use crate::rules::Rules;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Dialogue {
    pub(crate) text: String,
    pub(crate) visible: bool,
    pub(crate) shown_at: Option<DateTime<Utc>>,
    pub(crate) seq: u64,
}

/// Deferred callbacks. None of them is ever cancelled; each carries the
/// version of the state it was scheduled for and does nothing if that
/// state has moved on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Deferred {
    HideDialogue { seq: u64 },
    ResetAnimation { epoch: u64 },
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TimerQueue {
    entries: Vec<(DateTime<Utc>, Deferred)>,
}

impl TimerQueue {
    pub(crate) fn schedule(&mut self, at: DateTime<Utc>, what: Deferred) {
        self.entries.push((at, what));
    }

    /// Removes and returns everything due at `now`, earliest first.
    pub(crate) fn take_due(&mut self, now: DateTime<Utc>) -> Vec<Deferred> {
        let mut due: Vec<(DateTime<Utc>, Deferred)> = Vec::new();
        self.entries.retain(|entry| {
            if entry.0 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|entry| entry.0);
        due.into_iter().map(|(_, what)| what).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl GameState {
    pub(crate) fn show_dialogue(&mut self, text: impl Into<String>, rules: &Rules, now: DateTime<Utc>) {
        self.dialogue.seq = self.dialogue.seq.wrapping_add(1);
        self.dialogue.text = text.into();
        self.dialogue.visible = true;
        self.dialogue.shown_at = Some(now);
        tracing::debug!(text = %self.dialogue.text, "dialogue");
        self.timers.schedule(
            now + ChronoDuration::milliseconds(rules.dialogue_ms),
            Deferred::HideDialogue {
                seq: self.dialogue.seq,
            },
        );
    }

    pub(crate) fn hide_dialogue(&mut self) {
        self.dialogue.visible = false;
    }

    /// Runs every deferred callback that has come due, applying only those
    /// whose guard still holds.
    pub(crate) fn fire_due_timers(&mut self, rules: &Rules, now: DateTime<Utc>) {
        for what in self.timers.take_due(now) {
            match what {
                Deferred::HideDialogue { seq } => {
                    if self.dialogue.seq == seq {
                        self.hide_dialogue();
                    }
                }
                Deferred::ResetAnimation { epoch } => {
                    if self.anim.epoch == epoch && !self.anim.looping {
                        self.reset_animation(rules, now);
                    }
                }
            }
        }
    }
}
