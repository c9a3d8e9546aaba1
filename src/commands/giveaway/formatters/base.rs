use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::model::id::UserId;

use crate::commands::giveaway::models::GiveawayRecord;

// Platform-neutral embed content. Converted into a serenity builder right
// before sending.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GiveawayEmbed {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub footer: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<GiveawayEmbed> for CreateEmbed {
    fn from(embed: GiveawayEmbed) -> Self {
        let mut builder = CreateEmbed::new()
            .title(embed.title)
            .description(embed.description)
            .colour(embed.colour);
        if let Some(footer) = embed.footer {
            builder = builder.footer(CreateEmbedFooter::new(footer));
        }
        if let Some(thumbnail) = embed.thumbnail {
            builder = builder.thumbnail(thumbnail);
        }
        builder
    }
}

pub trait GiveawayFormatter: Send + Sync {
    // Announcement of a running giveaway, updated on every new entry.
    fn open(&self, record: &GiveawayRecord) -> GiveawayEmbed;
    // Replaces the announcement once the winners are drawn.
    fn decided(&self, record: &GiveawayRecord, winners: &[UserId]) -> GiveawayEmbed;
    // Replaces the announcement of a cancelled giveaway.
    fn cancelled(&self) -> GiveawayEmbed;
    // Introduction posted into the giveaway channel during the setup.
    fn lobby(&self, guild_icon: Option<String>) -> GiveawayEmbed;

    // Text posted in the channel after the draw.
    fn decision_announcement(&self, record: &GiveawayRecord, winners: &[UserId]) -> String;
    // Text posted in the channel after a reroll.
    fn reroll_announcement(&self, record: &GiveawayRecord, winner: UserId) -> String;
}
