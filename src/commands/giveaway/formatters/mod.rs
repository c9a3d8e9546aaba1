pub mod base;
pub mod embed;

pub use crate::commands::giveaway::formatters::base::{GiveawayEmbed, GiveawayFormatter};
pub use crate::commands::giveaway::formatters::embed::EmbedFormatter;
