use poise::CreateReply;
use serenity::builder::{CreateChannel, CreateEmbed, CreateMessage};
use serenity::model::channel::{ChannelType, PermissionOverwrite, PermissionOverwriteType};
use serenity::model::guild::Role;
use serenity::model::id::{ChannelId, RoleId};
use serenity::model::permissions::Permissions;
use tracing::{error, info};

use crate::commands::context::Context;
use crate::commands::giveaway::delivery::join_button;
use crate::commands::giveaway::eligibility::is_staff;
use crate::commands::giveaway::models::{NewGiveaway, Participant};
use crate::commands::giveaway::parser::parse_duration;
use crate::error::{Error, GiveawayError, Result};

async fn reply_ephemeral(ctx: Context<'_>, text: impl Into<String>) -> Result<()> {
    ctx.send(CreateReply::default().content(text).ephemeral(true))
        .await?;
    Ok(())
}

// Sends rejections of the giveaway rules back to the user, anything else
// goes up to the framework.
async fn reject(ctx: Context<'_>, err: Error) -> Result<()> {
    match err {
        Error::Giveaway(err) => reply_ephemeral(ctx, err.to_string()).await,
        err => Err(err),
    }
}

async fn require_staff(ctx: Context<'_>) -> Result<bool> {
    let allowed = match ctx.author_member().await {
        Some(member) => is_staff(&member, ctx.data().giveaways.config()),
        None => false,
    };

    if !allowed {
        reply_ephemeral(ctx, "You do not have permission to use this command.").await?;
    }
    Ok(allowed)
}

/// Start a giveaway
#[poise::command(slash_command, guild_only, rename = "giveaway")]
pub async fn start_giveaway(
    ctx: Context<'_>,
    #[description = "What are you giving away?"] prize: String,
    #[description = "Duration in minutes, or units like `45m`, `1h30m`, `2d`"] duration: String,
    #[description = "Number of winners (default 1)"] winners: Option<u32>,
    #[description = "Only members with this role can join"] required_role: Option<Role>,
) -> Result<()> {
    if !require_staff(ctx).await? {
        return Ok(());
    }

    let duration = match parse_duration(&duration) {
        Ok(parsed) => parsed.as_duration(),
        Err(err) => return reject(ctx, err).await,
    };

    let service = ctx.data().giveaways.clone();
    let guild_icon = ctx.guild().and_then(|guild| guild.icon_url());
    let request = NewGiveaway::new(
        &prize,
        duration,
        Participant::from(ctx.author()),
        ctx.channel_id(),
    )
    .with_winner_count(winners.unwrap_or(1))
    .with_required_role(required_role.map(|role| role.id))
    .with_guild_icon(guild_icon);

    let record = match service.manager().start(request) {
        Ok(record) => record,
        Err(err) => return reject(ctx, err).await,
    };

    let embed = service.formatter().open(&record);
    let reply = CreateReply::default()
        .embed(CreateEmbed::from(embed))
        .components(vec![join_button()]);
    let posted = match ctx.send(reply).await {
        Ok(handle) => handle.message().await.map(|message| message.id),
        Err(err) => Err(err),
    };

    match posted {
        Ok(message_id) => match service.manager().publish(record.id(), message_id) {
            Ok(_) => Ok(()),
            // Ended or cancelled while the announcement was on its way.
            Err(Error::Giveaway(GiveawayError::Conflict(_))) => {
                service
                    .delivery()
                    .settle_unpublished(service.manager(), &record, message_id)
                    .await
            }
            Err(err) => Err(err),
        },
        Err(err) => {
            error!(
                "Can't post the giveaway announcement, withdrawing giveaway {}: {}",
                record.id(),
                err.to_string()
            );
            service.manager().withdraw(record.id())?;
            Err(Error::from(err))
        }
    }
}

/// End the current giveaway early
#[poise::command(slash_command, guild_only, rename = "giveaway_end")]
pub async fn end_giveaway(ctx: Context<'_>) -> Result<()> {
    if !require_staff(ctx).await? {
        return Ok(());
    }
    ctx.defer_ephemeral().await?;

    let service = ctx.data().giveaways.clone();
    match service.manager().end()? {
        Some(decision) => {
            service.delivery().announce_decision(&decision).await;
            reply_ephemeral(ctx, "Giveaway has been ended.").await
        }
        None => reply_ephemeral(ctx, "There is no active giveaway to end.").await,
    }
}

/// Cancel the active giveaway without picking a winner
#[poise::command(slash_command, guild_only, rename = "giveaway_cancel")]
pub async fn cancel_giveaway(ctx: Context<'_>) -> Result<()> {
    if !require_staff(ctx).await? {
        return Ok(());
    }
    ctx.defer_ephemeral().await?;

    let service = ctx.data().giveaways.clone();
    match service.manager().cancel() {
        Ok(record) => {
            service.delivery().announce_cancellation(&record).await;
            reply_ephemeral(ctx, "Giveaway has been cancelled.").await
        }
        Err(Error::Giveaway(GiveawayError::NoActiveGiveaway)) => {
            reply_ephemeral(ctx, "There is no active giveaway to cancel.").await
        }
        Err(err) => reject(ctx, err).await,
    }
}

/// Re-pick a new winner from the last giveaway
#[poise::command(slash_command, guild_only, rename = "giveaway_reroll")]
pub async fn reroll_giveaway(ctx: Context<'_>) -> Result<()> {
    if !require_staff(ctx).await? {
        return Ok(());
    }
    ctx.defer_ephemeral().await?;

    let service = ctx.data().giveaways.clone();
    match service.manager().reroll() {
        Ok(reroll) => {
            service.delivery().announce_reroll(&reroll).await;
            reply_ephemeral(ctx, format!("Rerolled! New winner: <@{}>", reroll.winner)).await
        }
        Err(err) => reject(ctx, err).await,
    }
}

/// Create the giveaway channel
#[poise::command(slash_command, guild_only, rename = "setup_giveaway")]
pub async fn setup_giveaway(ctx: Context<'_>) -> Result<()> {
    if !require_staff(ctx).await? {
        return Ok(());
    }
    ctx.defer_ephemeral().await?;

    let guild_id = match ctx.guild_id() {
        Some(guild_id) => guild_id,
        None => return reply_ephemeral(ctx, "This command works only in a server.").await,
    };

    let service = ctx.data().giveaways.clone();
    let channel_name = service.config().giveaway_channel.clone();
    let channels = guild_id.channels(ctx.http()).await?;

    let existing = channels
        .values()
        .find(|channel| channel.name == channel_name)
        .or_else(|| {
            channels.values().find(|channel| {
                channel.kind == ChannelType::Text && channel.name.contains("giveaway")
            })
        })
        .map(|channel| channel.id);

    let channel_id: ChannelId = match existing {
        Some(channel_id) => {
            reply_ephemeral(ctx, format!("Using existing giveaway channel: <#{}>", channel_id))
                .await?;
            channel_id
        }
        None => {
            // The @everyone role shares its id with the guild.
            let everyone = RoleId::new(guild_id.get());
            let overwrites = vec![
                PermissionOverwrite {
                    allow: Permissions::VIEW_CHANNEL,
                    deny: Permissions::SEND_MESSAGES,
                    kind: PermissionOverwriteType::Role(everyone),
                },
                PermissionOverwrite {
                    allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
                    deny: Permissions::empty(),
                    kind: PermissionOverwriteType::Member(ctx.framework().bot_id),
                },
            ];
            let builder = CreateChannel::new(channel_name)
                .kind(ChannelType::Text)
                .permissions(overwrites);
            let channel = guild_id.create_channel(ctx.http(), builder).await?;

            info!("Created giveaway channel '{}' in guild {}", channel.name, guild_id);
            reply_ephemeral(ctx, format!("Created giveaway channel: <#{}>", channel.id)).await?;
            channel.id
        }
    };

    let guild_icon = ctx.guild().and_then(|guild| guild.icon_url());
    let embed = service.formatter().lobby(guild_icon);
    channel_id
        .send_message(ctx.http(), CreateMessage::new().embed(CreateEmbed::from(embed)))
        .await?;

    Ok(())
}
