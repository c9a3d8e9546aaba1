pub mod base;
pub mod uniform;

pub use crate::commands::giveaway::strategies::base::{DrawOptions, DrawStrategy};
pub use crate::commands::giveaway::strategies::uniform::{UniformDrawStrategy, sample_winners};
