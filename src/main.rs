pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod storage;

use std::sync::Arc;

use poise::serenity_prelude::GatewayIntents;
use serenity::client::Client;
use tracing::{error, info};

use crate::bot::Handler;
use crate::commands::context::UserData;
use crate::commands::giveaway::service::GiveawayService;
use crate::config::BotConfig;
use crate::error::Error;
use crate::storage::GiveawayStorage;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match BotConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(why) => panic!("Invalid configuration: {}", why),
    };

    let framework = poise::Framework::<UserData, Error>::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Got command '{}' by user '{}'",
                        ctx.command().qualified_name,
                        ctx.author().name
                    );
                })
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                let giveaways = ctx
                    .data
                    .read()
                    .await
                    .get::<GiveawayStorage>()
                    .cloned()
                    .ok_or_else(|| Error::Config("Expected GiveawayService in ShareMap.".to_string()))?;
                Ok(UserData { giveaways })
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged();
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .framework(framework)
        .await
        .expect("Cannot create a Discord client");

    let service = Arc::new(GiveawayService::new(client.http.clone(), config.clone()));
    {
        let mut data = client.data.write().await;
        data.insert::<GiveawayStorage>(service.clone());
    }

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    if let Err(why) = service.manager().shutdown() {
        error!("Can't disarm the giveaway timer: {}", why);
    }
}
