//! Error types for the TCG engine

use crate::core::EnergyType;
use crate::game::Condition;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TcgError>;

#[derive(Error, Debug)]
pub enum TcgError {
    #[error("Action rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("Card not found in catalog: #{0}")]
    CardNotFound(u32),

    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Invalid match setup: {0}")]
    InvalidSetup(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl From<serde_json::Error> for TcgError {
    fn from(e: serde_json::Error) -> Self {
        TcgError::SerializationError(e.to_string())
    }
}

impl TcgError {
    /// The rejection reason, if this error is an illegal-action rejection
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            TcgError::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

/// Machine-readable reason an action request was refused.
///
/// A rejected action never changes the match state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("the match is over")]
    GameOver,

    #[error("not allowed in the current phase")]
    WrongPhase,

    #[error("it is not this side's turn")]
    NotYourTurn,

    #[error("a prize or promotion choice is pending")]
    PendingChoice,

    #[error("no prize or promotion is pending for this side")]
    NothingPending,

    #[error("card is not in hand")]
    CardNotInHand,

    #[error("card is not a basic creature")]
    NotABasic,

    #[error("card is not an energy card")]
    NotAnEnergy,

    #[error("card is not a trainer card")]
    NotATrainer,

    #[error("slot is already occupied")]
    SlotOccupied,

    #[error("no creature in that slot")]
    EmptySlot,

    #[error("slot index out of range")]
    InvalidSlot,

    #[error("bench is full")]
    BenchFull,

    #[error("energy was already attached this turn")]
    EnergyAlreadyAttached,

    #[error("already retreated this turn")]
    AlreadyRetreated,

    #[error("no active creature")]
    NoActive,

    #[error("the defending side has no active creature")]
    NoDefender,

    #[error("attack index out of range")]
    InvalidAttackIndex,

    #[error("attacker cannot act while {0}")]
    AttackerCannotAct(Condition),

    #[error("not enough energy attached")]
    InsufficientEnergy,

    #[error("discard cost needs {count} {energy} energy")]
    DiscardCostUnmet { energy: EnergyType, count: u8 },

    #[error("attack can only be used once while in play")]
    AttackAlreadyUsed,

    #[error("creature entered play this turn")]
    EvolutionLocked,

    #[error("card does not evolve from that creature")]
    NotAnEvolution,

    #[error("retreat is blocked while {0}")]
    RetreatBlocked(Condition),

    #[error("chosen energy does not match the retreat cost")]
    InvalidRetreatPayment,

    #[error("no effect known for this trainer")]
    UnknownTrainer,

    #[error("trainer has no valid target")]
    NoTrainerTarget,

    #[error("prize index out of range")]
    InvalidPrizeIndex,

    #[error("side must place an active creature before it is ready")]
    NotReady,
}
