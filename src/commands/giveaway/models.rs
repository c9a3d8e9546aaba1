use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serenity::model::id::{ChannelId, MessageId, RoleId, UserId};
use serenity::model::user::User as DiscordUser;
use uuid::Uuid;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Participant {
    user_id: UserId,
    username: String,
}

impl Participant {
    pub fn new(user_id: UserId, username: &str) -> Self {
        Participant {
            user_id,
            username: username.to_string(),
        }
    }

    // Returns a unique identifier in Discord
    pub fn get_user_id(&self) -> UserId {
        self.user_id
    }

    // Returns a username in the Discord room
    pub fn get_username(&self) -> String {
        self.username.clone()
    }
}

impl From<&DiscordUser> for Participant {
    fn from(discord_user: &DiscordUser) -> Self {
        Participant {
            user_id: discord_user.id,
            username: discord_user.display_name().to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GiveawayStatus {
    // Accepting entries, the countdown is armed.
    Open,
    // Winners were drawn.
    Decided,
    // Stopped without a draw.
    Cancelled,
}

// Everything the host provides for starting a giveaway.
#[derive(Debug, Clone)]
pub struct NewGiveaway {
    pub prize: String,
    pub duration: Duration,
    pub winner_count: u32,
    pub required_role: Option<RoleId>,
    pub host: Participant,
    pub channel_id: ChannelId,
    pub guild_icon: Option<String>,
}

impl NewGiveaway {
    pub fn new(prize: &str, duration: Duration, host: Participant, channel_id: ChannelId) -> Self {
        NewGiveaway {
            prize: prize.to_string(),
            duration,
            winner_count: 1,
            required_role: None,
            host,
            channel_id,
            guild_icon: None,
        }
    }

    pub fn with_winner_count(mut self, winner_count: u32) -> Self {
        self.winner_count = winner_count;
        self
    }

    pub fn with_required_role(mut self, role: Option<RoleId>) -> Self {
        self.required_role = role;
        self
    }

    pub fn with_guild_icon(mut self, icon: Option<String>) -> Self {
        self.guild_icon = icon;
        self
    }
}

// A single giveaway. Callers only ever get clones of the record owned by
// the manager, so a snapshot never changes under the reader.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GiveawayRecord {
    id: Uuid,
    prize: String,
    host: Participant,
    channel_id: ChannelId,
    // Unset until the announcement message has been posted.
    message_id: Option<MessageId>,
    end_at: DateTime<Utc>,
    winner_count: u32,
    required_role: Option<RoleId>,
    guild_icon: Option<String>,
    participants: HashSet<UserId>,
    status: GiveawayStatus,
}

impl GiveawayRecord {
    pub(crate) fn open(request: NewGiveaway, end_at: DateTime<Utc>) -> Self {
        GiveawayRecord {
            id: Uuid::new_v4(),
            prize: request.prize,
            host: request.host,
            channel_id: request.channel_id,
            message_id: None,
            end_at,
            winner_count: request.winner_count,
            required_role: request.required_role,
            guild_icon: request.guild_icon,
            participants: HashSet::new(),
            status: GiveawayStatus::Open,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn prize(&self) -> &str {
        &self.prize
    }

    pub fn host(&self) -> &Participant {
        &self.host
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub fn message_id(&self) -> Option<MessageId> {
        self.message_id
    }

    pub fn end_at(&self) -> DateTime<Utc> {
        self.end_at
    }

    pub fn winner_count(&self) -> u32 {
        self.winner_count
    }

    pub fn required_role(&self) -> Option<RoleId> {
        self.required_role
    }

    pub fn guild_icon(&self) -> Option<&str> {
        self.guild_icon.as_deref()
    }

    pub fn participants(&self) -> &HashSet<UserId> {
        &self.participants
    }

    pub fn participants_count(&self) -> usize {
        self.participants.len()
    }

    pub fn status(&self) -> GiveawayStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == GiveawayStatus::Open
    }

    // Open giveaways accept entries only after the announcement is linked.
    pub fn is_published(&self) -> bool {
        self.message_id.is_some()
    }

    pub(crate) fn set_message_id(&mut self, message_id: MessageId) {
        self.message_id = Some(message_id);
    }

    // Returns false when the user has already entered.
    pub(crate) fn add_participant(&mut self, user_id: UserId) -> bool {
        debug_assert!(self.is_open());
        self.participants.insert(user_id)
    }

    pub(crate) fn close(&mut self, status: GiveawayStatus) {
        debug_assert!(self.is_open() && status != GiveawayStatus::Open);
        self.status = status;
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Decision {
    pub record: GiveawayRecord,
    pub winners: Vec<UserId>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Reroll {
    pub record: GiveawayRecord,
    pub winner: UserId,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct JoinReceipt {
    pub participants: usize,
    pub record: GiveawayRecord,
}
