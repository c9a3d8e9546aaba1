pub mod context;
pub mod giveaway;

use crate::commands::context::UserData;
use crate::error::Error;

// Every slash command registered by the bot.
pub fn all() -> Vec<poise::Command<UserData, Error>> {
    vec![
        giveaway::start_giveaway(),
        giveaway::end_giveaway(),
        giveaway::cancel_giveaway(),
        giveaway::reroll_giveaway(),
        giveaway::setup_giveaway(),
    ]
}
