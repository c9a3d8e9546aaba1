use std::sync::Arc;

use serenity::prelude::TypeMapKey;

use crate::commands::giveaway::service::GiveawayService;

pub struct GiveawayStorage;

impl TypeMapKey for GiveawayStorage {
    type Value = Arc<GiveawayService>;
}
