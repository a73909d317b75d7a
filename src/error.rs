use thiserror::Error;

/// Why an interaction was turned down. Refusals are never fatal; the pet
/// usually says something about it through the dialogue box.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub(crate) enum Refusal {
    #[error("the pet has passed away")]
    Dead,
    #[error("the pet has not hatched yet")]
    Egg,
    #[error("the pet is not an egg")]
    NotAnEgg,
    #[error("the pet is busy with work or study")]
    Busy,
    #[error("need {need} coins but only have {have}")]
    NotEnoughCoins { need: u32, have: u32 },
    #[error("level {need} required, currently {have}")]
    LevelTooLow { need: u32, have: u32 },
    #[error("intelligence {need} required")]
    NotSmartEnough { need: f32 },
    #[error("too hungry")]
    TooHungry,
    #[error("too sick")]
    TooSick,
}
