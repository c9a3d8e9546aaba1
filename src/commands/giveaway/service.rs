use std::sync::Arc;

use serenity::http::Http;

use crate::commands::giveaway::delivery::{GiveawayDelivery, HttpSink, MessageSink};
use crate::commands::giveaway::formatters::{EmbedFormatter, GiveawayFormatter};
use crate::commands::giveaway::manager::GiveawayManager;
use crate::config::BotConfig;
use crate::error::Result;
use crate::scheduler::{Scheduler, TokioScheduler};

// Everything the giveaway commands need, shared between the poise commands
// and the component interaction handler.
pub struct GiveawayService {
    manager: Arc<GiveawayManager>,
    delivery: Arc<GiveawayDelivery>,
    config: Arc<BotConfig>,
}

impl GiveawayService {
    pub fn new(http: Arc<Http>, config: Arc<BotConfig>) -> Self {
        let formatter: Arc<dyn GiveawayFormatter> = Arc::new(EmbedFormatter::new());
        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::new());
        let sink: Arc<dyn MessageSink> = Arc::new(HttpSink::new(http));
        let delivery = Arc::new(GiveawayDelivery::new(sink, formatter));
        let manager = GiveawayManager::new(scheduler)
            .with_entry_role(config.verify_role)
            .with_listener(delivery.clone());

        GiveawayService {
            manager: Arc::new(manager),
            delivery,
            config,
        }
    }

    pub fn manager(&self) -> &Arc<GiveawayManager> {
        &self.manager
    }

    pub fn delivery(&self) -> &Arc<GiveawayDelivery> {
        &self.delivery
    }

    pub fn formatter(&self) -> Arc<dyn GiveawayFormatter> {
        self.delivery.formatter()
    }

    pub fn config(&self) -> &Arc<BotConfig> {
        &self.config
    }

    // Re-renders the announcement from the latest snapshot.
    pub async fn refresh_announcement(&self) -> Result<()> {
        self.delivery.refresh_open(&self.manager).await
    }
}
