use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;

pub type ScheduledTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

// Disarms a scheduled task. Dropping the handle leaves the task armed.
pub trait CancelHandle: Send + Sync {
    fn cancel(&self);
}

pub trait Scheduler: Send + Sync {
    // Current wall-clock time used for computing deadlines.
    fn now(&self) -> DateTime<Utc>;

    // Runs the task once after the delay, unless cancelled before.
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> Box<dyn CancelHandle>;
}

#[derive(Debug, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        TokioScheduler {}
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule(&self, delay: Duration, task: ScheduledTask) -> Box<dyn CancelHandle> {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Box::new(TokioCancelHandle(handle.abort_handle()))
    }
}

struct TokioCancelHandle(AbortHandle);

impl CancelHandle for TokioCancelHandle {
    fn cancel(&self) {
        self.0.abort();
    }
}
