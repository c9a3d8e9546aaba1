use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::client::Context;
use serenity::model::application::ComponentInteraction;
use tracing::{error, info};

use crate::commands::giveaway::delivery::JOIN_BUTTON_ID;
use crate::commands::giveaway::service::GiveawayService;
use crate::error::{Error, Result};

pub fn is_giveaway_component(component: &ComponentInteraction) -> bool {
    component.data.custom_id == JOIN_BUTTON_ID
}

// Handles a click on the "Join Giveaway" button.
pub async fn join_giveaway(
    ctx: &Context,
    component: &ComponentInteraction,
    service: &GiveawayService,
) -> Result<()> {
    let mut joined = false;
    let reply = match component.member.as_ref() {
        Some(member) => match service.manager().join(component.user.id, member) {
            Ok(receipt) => {
                info!(
                    "User '{}' entered giveaway {} ({} participants)",
                    component.user.name,
                    receipt.record.id(),
                    receipt.participants
                );
                joined = true;
                Ok("You have entered the giveaway! Good luck! 🍀".to_string())
            }
            Err(Error::Giveaway(err)) => Ok(err.to_string()),
            Err(err) => Err(err),
        },
        None => Ok("Giveaways can be joined only from a server.".to_string()),
    };

    let content = match reply {
        Ok(content) => content,
        Err(err) => {
            error!("Can't process the giveaway entry: {}", err.to_string());
            "Something went wrong, please try again later.".to_string()
        }
    };

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    component.create_response(&ctx.http, response).await?;

    match joined {
        true => service.refresh_announcement().await,
        false => Ok(()),
    }
}
