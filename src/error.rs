use std::result;
use std::sync::PoisonError;

use serenity::model::id::RoleId;
use serenity::prelude::SerenityError;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error("{0}")]
    SerenityError(String),
    #[error("{0}")]
    Lock(String),
    #[error("{0}")]
    Config(String),
    #[error(transparent)]
    Giveaway(#[from] GiveawayError),
}

// Rejections of a giveaway operation. The display text is sent back to
// the user as is.
#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum GiveawayError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("There is no active giveaway right now.")]
    NoActiveGiveaway,
    #[error("You already joined this giveaway!")]
    AlreadyJoined,
    #[error("You must be verified to join the giveaway!")]
    NotVerified,
    #[error("You need the <@&{0}> role to join this giveaway!")]
    IneligibleRole(RoleId),
    #[error("There is no previous giveaway to reroll.")]
    NoPriorGiveaway,
    #[error("The last giveaway had no participants.")]
    NoParticipants,
}

impl From<SerenityError> for Error {
    fn from(err: SerenityError) -> Error {
        let description = err.to_string();
        Error::SerenityError(description)
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Error {
        Error::Lock("The giveaway state lock was poisoned by a panicked thread.".to_string())
    }
}
