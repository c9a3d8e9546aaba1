// Default look of the giveaway messages
use serenity::model::id::UserId;

use crate::commands::giveaway::formatters::base::{GiveawayEmbed, GiveawayFormatter};
use crate::commands::giveaway::models::GiveawayRecord;

const OPEN_COLOUR: u32 = 0x2ECC71;
const DECIDED_COLOUR: u32 = 0xF1C40F;
const CANCELLED_COLOUR: u32 = 0xE74C3C;
const LOBBY_COLOUR: u32 = 0x2B2D31;
const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Default)]
pub struct EmbedFormatter;

impl EmbedFormatter {
    pub fn new() -> Self {
        EmbedFormatter {}
    }

    fn mentions(&self, winners: &[UserId]) -> Vec<String> {
        winners
            .iter()
            .map(|user_id| format!("<@{}>", user_id))
            .collect()
    }
}

impl GiveawayFormatter for EmbedFormatter {
    fn open(&self, record: &GiveawayRecord) -> GiveawayEmbed {
        let role_text = match record.required_role() {
            Some(role_id) => format!("<@&{}>", role_id),
            None => "Everyone".to_string(),
        };

        GiveawayEmbed {
            title: "🎰  GIVEAWAY  🎰".to_string(),
            description: format!(
                "🎁 **Prize:** {}\n\n\
                 ⏰ **Ends:** <t:{}:R>\n\
                 👑 **Hosted by:** <@{}>\n\
                 🏆 **Winners:** {}\n\
                 🎭 **Required Role:** {}\n\n\
                 👥 **Participants:** {}\n\n\
                 Click the button below to enter!",
                record.prize(),
                record.end_at().timestamp(),
                record.host().get_user_id(),
                record.winner_count(),
                role_text,
                record.participants_count(),
            ),
            colour: OPEN_COLOUR,
            footer: Some("Good luck to everyone!".to_string()),
            thumbnail: record.guild_icon().map(|icon| icon.to_string()),
        }
    }

    fn decided(&self, record: &GiveawayRecord, winners: &[UserId]) -> GiveawayEmbed {
        let winners_text = match winners.is_empty() {
            true => "No participants".to_string(),
            false => self.mentions(winners).join(", "),
        };

        GiveawayEmbed {
            title: "🎰  GIVEAWAY ENDED  🎰".to_string(),
            description: format!(
                "🎁 **Prize:** {}\n\
                 🏆 **Winner(s):** {}\n\
                 👥 **Participants:** {}\n\n\
                 Congratulations! 🎊",
                record.prize(),
                winners_text,
                record.participants_count(),
            ),
            colour: DECIDED_COLOUR,
            footer: Some(format!("Hosted by {}", record.host().get_username())),
            thumbnail: None,
        }
    }

    fn cancelled(&self) -> GiveawayEmbed {
        GiveawayEmbed {
            title: "🎰  GIVEAWAY CANCELLED  🎰".to_string(),
            description: "This giveaway has been cancelled.".to_string(),
            colour: CANCELLED_COLOUR,
            footer: None,
            thumbnail: None,
        }
    }

    fn lobby(&self, guild_icon: Option<String>) -> GiveawayEmbed {
        GiveawayEmbed {
            title: "🎰  Giveaways".to_string(),
            description: format!(
                "{}\n\n\
                 Welcome to the giveaway room!\n\n\
                 **How it works:**\n\
                 >>> 🎁 Admins will post giveaways here\n\
                 ✅ You must be **verified** to participate\n\
                 🎉 Click the button to enter when a giveaway is live\n\
                 🏆 Winners are picked randomly when time runs out\n\n\
                 {}",
                SEPARATOR, SEPARATOR,
            ),
            colour: LOBBY_COLOUR,
            footer: Some("Stay tuned for the next giveaway!".to_string()),
            thumbnail: guild_icon,
        }
    }

    fn decision_announcement(&self, record: &GiveawayRecord, winners: &[UserId]) -> String {
        match winners.is_empty() {
            true => "🎰 **Giveaway ended!** No one participated. No winner this time.".to_string(),
            false => format!(
                "🎊 Congratulations {}! You won **{}**!",
                self.mentions(winners).join(" "),
                record.prize(),
            ),
        }
    }

    fn reroll_announcement(&self, record: &GiveawayRecord, winner: UserId) -> String {
        format!(
            "🎰 **Giveaway Reroll** - The new winner for **{}** is <@{}>! Congratulations! 🎊",
            record.prize(),
            winner,
        )
    }
}
