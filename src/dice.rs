use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of every random decision the game makes: Bernoulli gates and
/// uniform picks from fixed candidate lists.
pub(crate) trait Dice {
    /// True with probability `p` (clamped to [0,1]).
    fn roll(&mut self, p: f64) -> bool;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub(crate) struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// A seed of 0 means "seed from entropy".
    pub(crate) fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(seed)
        };
        Self { rng }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

pub(crate) fn choose<T: Copy>(dice: &mut dyn Dice, items: &[T]) -> T {
    items[dice.pick(items.len()).min(items.len() - 1)]
}

/// Dice with pinned outcomes for tests. Once a script runs dry it keeps
/// answering with its fallback.
#[cfg(test)]
pub(crate) struct ScriptedDice {
    rolls: std::collections::VecDeque<bool>,
    picks: std::collections::VecDeque<usize>,
    fallback_roll: bool,
}

#[cfg(test)]
impl ScriptedDice {
    /// Every gate fails and every pick is the first candidate.
    pub(crate) fn never() -> Self {
        Self {
            rolls: Default::default(),
            picks: Default::default(),
            fallback_roll: false,
        }
    }

    pub(crate) fn always() -> Self {
        Self {
            fallback_roll: true,
            ..Self::never()
        }
    }

    pub(crate) fn with_rolls(mut self, rolls: &[bool]) -> Self {
        self.rolls.extend(rolls.iter().copied());
        self
    }

    pub(crate) fn with_picks(mut self, picks: &[usize]) -> Self {
        self.picks.extend(picks.iter().copied());
        self
    }
}

#[cfg(test)]
impl Dice for ScriptedDice {
    fn roll(&mut self, _p: f64) -> bool {
        self.rolls.pop_front().unwrap_or(self.fallback_roll)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_dice_is_reproducible() {
        let mut a = SeededDice::new(42);
        let mut b = SeededDice::new(42);
        for _ in 0..32 {
            assert_eq!(a.pick(9), b.pick(9));
            assert_eq!(a.roll(0.3), b.roll(0.3));
        }
    }

    #[test]
    fn roll_extremes_are_certain() {
        let mut d = SeededDice::new(7);
        for _ in 0..100 {
            assert!(!d.roll(0.0));
            assert!(d.roll(1.0));
            assert!(!d.roll(-3.0));
        }
    }

    #[test]
    fn choose_uses_picked_index() {
        let mut d = ScriptedDice::never().with_picks(&[2, 0, 99]);
        let items = ['a', 'b', 'c'];
        assert_eq!(choose(&mut d, &items), 'c');
        assert_eq!(choose(&mut d, &items), 'a');
        assert_eq!(choose(&mut d, &items), 'c');
    }
}
