use std::sync::Arc;

use serenity::async_trait;
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateMessage, EditMessage,
};
use serenity::http::Http;
use serenity::model::application::ButtonStyle;
use serenity::model::id::{ChannelId, MessageId};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info, warn};

use crate::commands::giveaway::formatters::{GiveawayEmbed, GiveawayFormatter};
use crate::commands::giveaway::manager::{DecisionListener, GiveawayManager};
use crate::commands::giveaway::models::{Decision, GiveawayRecord, Reroll};
use crate::error::Result;

pub const JOIN_BUTTON_ID: &str = "giveaway_join_btn";
pub const ENDED_BUTTON_ID: &str = "giveaway_ended_btn";
pub const CANCELLED_BUTTON_ID: &str = "giveaway_cancelled_btn";

// The single button shown under the announcement.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AnnouncementButton {
    Join,
    Ended,
    Cancelled,
}

fn disabled_button(custom_id: &str, label: &str) -> CreateButton {
    CreateButton::new(custom_id)
        .label(label)
        .style(ButtonStyle::Secondary)
        .disabled(true)
}

impl From<AnnouncementButton> for CreateActionRow {
    fn from(button: AnnouncementButton) -> Self {
        let button = match button {
            AnnouncementButton::Join => CreateButton::new(JOIN_BUTTON_ID)
                .label("Join Giveaway 🎉")
                .style(ButtonStyle::Success),
            AnnouncementButton::Ended => disabled_button(ENDED_BUTTON_ID, "Giveaway Ended"),
            AnnouncementButton::Cancelled => {
                disabled_button(CANCELLED_BUTTON_ID, "Giveaway Cancelled")
            }
        };
        CreateActionRow::Buttons(vec![button])
    }
}

pub fn join_button() -> CreateActionRow {
    CreateActionRow::from(AnnouncementButton::Join)
}

// Where the giveaway messages end up.
#[async_trait]
pub trait MessageSink: Send + Sync {
    // Returns false when the announcement can't be updated.
    async fn edit_announcement(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        embed: GiveawayEmbed,
        button: AnnouncementButton,
    ) -> bool;
    async fn send_embed(&self, channel_id: ChannelId, embed: GiveawayEmbed);
    async fn say(&self, channel_id: ChannelId, text: &str);
}

pub struct HttpSink {
    http: Arc<Http>,
}

impl HttpSink {
    pub fn new(http: Arc<Http>) -> Self {
        HttpSink { http }
    }
}

#[async_trait]
impl MessageSink for HttpSink {
    async fn edit_announcement(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        embed: GiveawayEmbed,
        button: AnnouncementButton,
    ) -> bool {
        let builder = EditMessage::new()
            .embed(CreateEmbed::from(embed))
            .components(vec![CreateActionRow::from(button)]);

        match channel_id.edit_message(&*self.http, message_id, builder).await {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    "Can't update the giveaway announcement {}: {}",
                    message_id,
                    err.to_string()
                );
                false
            }
        }
    }

    async fn send_embed(&self, channel_id: ChannelId, embed: GiveawayEmbed) {
        let message = CreateMessage::new().embed(CreateEmbed::from(embed));
        if let Err(err) = channel_id.send_message(&*self.http, message).await {
            error!(
                "Can't send the giveaway notice to the channel: {}",
                err.to_string()
            );
        }
    }

    async fn say(&self, channel_id: ChannelId, text: &str) {
        if let Err(err) = channel_id.say(&*self.http, text).await {
            error!(
                "Impossible to output the giveaway message in the channel. Reason: {}",
                err.to_string()
            );
        }
    }
}

// Pushes giveaway state into the channel. Nothing here can fail a giveaway
// transition: errors are logged and the state machine moves on.
pub struct GiveawayDelivery {
    sink: Arc<dyn MessageSink>,
    formatter: Arc<dyn GiveawayFormatter>,
    // Held for every announcement edit, so a slow counter refresh can't land
    // after the final state of the giveaway.
    render_lock: AsyncMutex<()>,
}

impl GiveawayDelivery {
    pub fn new(sink: Arc<dyn MessageSink>, formatter: Arc<dyn GiveawayFormatter>) -> Self {
        GiveawayDelivery {
            sink,
            formatter,
            render_lock: AsyncMutex::new(()),
        }
    }

    pub fn formatter(&self) -> Arc<dyn GiveawayFormatter> {
        self.formatter.clone()
    }

    // Updates the participant counter from the latest snapshot. A giveaway
    // that finished meanwhile is left to its final edit.
    pub async fn refresh_open(&self, manager: &GiveawayManager) -> Result<()> {
        let _guard = self.render_lock.lock().await;

        let record = match manager.active()? {
            Some(record) => record,
            None => return Ok(()),
        };
        let message_id = match record.message_id() {
            Some(message_id) => message_id,
            None => return Ok(()),
        };

        let embed = self.formatter.open(&record);
        self.sink
            .edit_announcement(record.channel_id(), message_id, embed, AnnouncementButton::Join)
            .await;
        Ok(())
    }

    // Disables the announcement and posts the winners.
    pub async fn announce_decision(&self, decision: &Decision) {
        let record = &decision.record;

        if let Some(message_id) = record.message_id() {
            let _guard = self.render_lock.lock().await;
            let embed = self.formatter.decided(record, &decision.winners);
            self.sink
                .edit_announcement(record.channel_id(), message_id, embed, AnnouncementButton::Ended)
                .await;
        }

        let text = self
            .formatter
            .decision_announcement(record, &decision.winners);
        self.sink.say(record.channel_id(), &text).await;
    }

    // Disables the announcement, or posts the notice anew when the original
    // message is gone.
    pub async fn announce_cancellation(&self, record: &GiveawayRecord) {
        let _guard = self.render_lock.lock().await;

        let edited = match record.message_id() {
            Some(message_id) => {
                self.sink
                    .edit_announcement(
                        record.channel_id(),
                        message_id,
                        self.formatter.cancelled(),
                        AnnouncementButton::Cancelled,
                    )
                    .await
            }
            None => false,
        };

        if !edited {
            self.sink
                .send_embed(record.channel_id(), self.formatter.cancelled())
                .await;
        }
    }

    // Brings an announcement posted after its giveaway already finished to
    // the final state: decided when it is the last decision, cancelled
    // otherwise.
    pub async fn settle_unpublished(
        &self,
        manager: &GiveawayManager,
        record: &GiveawayRecord,
        message_id: MessageId,
    ) -> Result<()> {
        let _guard = self.render_lock.lock().await;

        let (embed, button) = match manager.last_decision()? {
            Some(decision) if decision.record.id() == record.id() => (
                self.formatter.decided(&decision.record, &decision.winners),
                AnnouncementButton::Ended,
            ),
            _ => (self.formatter.cancelled(), AnnouncementButton::Cancelled),
        };

        info!(
            "Giveaway {} finished before its announcement was posted, closing message {}",
            record.id(),
            message_id
        );
        self.sink
            .edit_announcement(record.channel_id(), message_id, embed, button)
            .await;
        Ok(())
    }

    pub async fn announce_reroll(&self, reroll: &Reroll) {
        let text = self
            .formatter
            .reroll_announcement(&reroll.record, reroll.winner);
        self.sink.say(reroll.record.channel_id(), &text).await;
    }
}

#[async_trait]
impl DecisionListener for GiveawayDelivery {
    async fn on_decided(&self, decision: &Decision) {
        self.announce_decision(decision).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serenity::async_trait;
    use serenity::model::id::{ChannelId, MessageId, UserId};
    use tokio::sync::{Notify, Semaphore};

    use crate::commands::giveaway::delivery::{
        AnnouncementButton, GiveawayDelivery, MessageSink,
    };
    use crate::commands::giveaway::eligibility::testing::RoleBook;
    use crate::commands::giveaway::formatters::{EmbedFormatter, GiveawayEmbed};
    use crate::commands::giveaway::manager::GiveawayManager;
    use crate::commands::giveaway::models::{NewGiveaway, Participant};
    use crate::scheduler::testing::ManualScheduler;

    // Keeps every message instead of sending it. Edits wait on the gate
    // before they land, which lets a test hold one in flight.
    struct RecordingSink {
        edits: Mutex<Vec<(MessageId, String, AnnouncementButton)>>,
        sent: Mutex<Vec<String>>,
        said: Mutex<Vec<String>>,
        started: AtomicUsize,
        entered: Notify,
        gate: Semaphore,
        edits_succeed: bool,
    }

    impl RecordingSink {
        fn with_gate(permits: usize, edits_succeed: bool) -> Self {
            RecordingSink {
                edits: Mutex::new(Vec::new()),
                sent: Mutex::new(Vec::new()),
                said: Mutex::new(Vec::new()),
                started: AtomicUsize::new(0),
                entered: Notify::new(),
                gate: Semaphore::new(permits),
                edits_succeed,
            }
        }

        fn new() -> Self {
            Self::with_gate(Semaphore::MAX_PERMITS, true)
        }

        fn gated() -> Self {
            Self::with_gate(0, true)
        }

        fn failing() -> Self {
            Self::with_gate(Semaphore::MAX_PERMITS, false)
        }

        fn buttons(&self) -> Vec<AnnouncementButton> {
            self.edits.lock().unwrap().iter().map(|edit| edit.2).collect()
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn edit_announcement(
            &self,
            _channel_id: ChannelId,
            message_id: MessageId,
            embed: GiveawayEmbed,
            button: AnnouncementButton,
        ) -> bool {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            let _permit = self.gate.acquire().await.unwrap();
            self.edits.lock().unwrap().push((message_id, embed.title, button));
            self.edits_succeed
        }

        async fn send_embed(&self, _channel_id: ChannelId, embed: GiveawayEmbed) {
            self.sent.lock().unwrap().push(embed.title);
        }

        async fn say(&self, _channel_id: ChannelId, text: &str) {
            self.said.lock().unwrap().push(text.to_string());
        }
    }

    fn get_delivery(sink: &Arc<RecordingSink>) -> Arc<GiveawayDelivery> {
        Arc::new(GiveawayDelivery::new(sink.clone(), Arc::new(EmbedFormatter::new())))
    }

    fn get_manager() -> Arc<GiveawayManager> {
        Arc::new(GiveawayManager::new(Arc::new(ManualScheduler::new())))
    }

    fn get_request() -> NewGiveaway {
        let host = Participant::new(UserId::new(1), "Host");
        NewGiveaway::new("Gift Card", Duration::from_secs(60), host, ChannelId::new(7))
    }

    fn start_with_entry(manager: &Arc<GiveawayManager>) {
        let record = manager.start(get_request()).unwrap();
        manager.publish(record.id(), MessageId::new(99)).unwrap();
        manager.join(UserId::new(2), &RoleBook::new()).unwrap();
    }

    #[tokio::test]
    async fn test_decision_edit_lands_after_pending_refresh() {
        let sink = Arc::new(RecordingSink::gated());
        let delivery = get_delivery(&sink);
        let manager = get_manager();
        start_with_entry(&manager);

        let refresh = tokio::spawn({
            let delivery = delivery.clone();
            let manager = manager.clone();
            async move { delivery.refresh_open(&manager).await }
        });
        // The open snapshot is taken and its edit is in flight.
        sink.entered.notified().await;

        let decision = manager.end().unwrap().unwrap();
        let announce = tokio::spawn({
            let delivery = delivery.clone();
            async move { delivery.announce_decision(&decision).await }
        });
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(sink.started.load(Ordering::SeqCst), 1);

        sink.gate.add_permits(2);
        refresh.await.unwrap().unwrap();
        announce.await.unwrap();

        assert_eq!(
            sink.buttons(),
            vec![AnnouncementButton::Join, AnnouncementButton::Ended]
        );
        let edits = sink.edits.lock().unwrap().clone();
        assert_eq!(edits[1].1, "🎰  GIVEAWAY ENDED  🎰");
        assert_eq!(sink.said.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_decision_keeps_final_state() {
        let sink = Arc::new(RecordingSink::new());
        let delivery = get_delivery(&sink);
        let manager = get_manager();
        start_with_entry(&manager);

        let decision = manager.end().unwrap().unwrap();
        delivery.announce_decision(&decision).await;
        delivery.refresh_open(&manager).await.unwrap();

        assert_eq!(sink.buttons(), vec![AnnouncementButton::Ended]);
    }

    #[tokio::test]
    async fn test_refresh_renders_participant_count() {
        let sink = Arc::new(RecordingSink::new());
        let delivery = get_delivery(&sink);
        let manager = get_manager();
        start_with_entry(&manager);

        delivery.refresh_open(&manager).await.unwrap();

        let edits = sink.edits.lock().unwrap().clone();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, MessageId::new(99));
        assert_eq!(edits[0].2, AnnouncementButton::Join);
    }

    #[tokio::test]
    async fn test_settle_announcement_of_giveaway_ended_before_publish() {
        let sink = Arc::new(RecordingSink::new());
        let delivery = get_delivery(&sink);
        let manager = get_manager();
        let record = manager.start(get_request()).unwrap();

        let decision = manager.end().unwrap().unwrap();
        delivery.announce_decision(&decision).await;
        assert_eq!(sink.buttons().is_empty(), true);

        assert_eq!(manager.publish(record.id(), MessageId::new(99)).is_err(), true);
        delivery
            .settle_unpublished(&manager, &record, MessageId::new(99))
            .await
            .unwrap();

        let edits = sink.edits.lock().unwrap().clone();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, MessageId::new(99));
        assert_eq!(edits[0].1, "🎰  GIVEAWAY ENDED  🎰");
        assert_eq!(edits[0].2, AnnouncementButton::Ended);
    }

    #[tokio::test]
    async fn test_settle_announcement_of_giveaway_cancelled_before_publish() {
        let sink = Arc::new(RecordingSink::new());
        let delivery = get_delivery(&sink);
        let manager = get_manager();
        let record = manager.start(get_request()).unwrap();
        manager.cancel().unwrap();

        assert_eq!(manager.publish(record.id(), MessageId::new(99)).is_err(), true);
        delivery
            .settle_unpublished(&manager, &record, MessageId::new(99))
            .await
            .unwrap();

        assert_eq!(sink.buttons(), vec![AnnouncementButton::Cancelled]);
        assert_eq!(sink.edits.lock().unwrap()[0].1, "🎰  GIVEAWAY CANCELLED  🎰");
    }

    #[tokio::test]
    async fn test_cancellation_falls_back_to_new_message() {
        let sink = Arc::new(RecordingSink::failing());
        let delivery = get_delivery(&sink);
        let manager = get_manager();
        start_with_entry(&manager);

        let record = manager.cancel().unwrap();
        delivery.announce_cancellation(&record).await;

        assert_eq!(sink.buttons(), vec![AnnouncementButton::Cancelled]);
        assert_eq!(
            sink.sent.lock().unwrap().clone(),
            vec!["🎰  GIVEAWAY CANCELLED  🎰".to_string()]
        );
    }
}
