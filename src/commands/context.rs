use std::sync::Arc;

use poise::Context as PoiseContext;

use crate::commands::giveaway::service::GiveawayService;

// User data, which is stored and accessible in all command invocations
pub struct UserData {
    pub giveaways: Arc<GiveawayService>,
}

// Generic context available across Poise commands
pub type Context<'a> = PoiseContext<'a, UserData, crate::error::Error>;
