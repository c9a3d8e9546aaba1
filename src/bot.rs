use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::application::Interaction;
use serenity::model::gateway::Ready;
use tracing::{error, info};

use crate::commands::giveaway::interactions::{is_giveaway_component, join_giveaway};
use crate::storage::GiveawayStorage;

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let component = match interaction {
            Interaction::Component(component) if is_giveaway_component(&component) => component,
            _ => return,
        };

        let service = match ctx.data.read().await.get::<GiveawayStorage>().cloned() {
            Some(service) => service,
            None => {
                error!("Expected GiveawayService in ShareMap.");
                return;
            }
        };

        if let Err(err) = join_giveaway(&ctx, &component, &service).await {
            error!(
                "Can't handle the giveaway button for '{}': {}",
                component.user.name,
                err.to_string()
            );
        }
    }
}
