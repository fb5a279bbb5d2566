//! Job Scheduler
//!
//! Runs the daily batch (bond decay, habit reset, reminders, alerts)
//! at a configured interval. Jobs take `now` and are safe to re-run,
//! so a missed or doubled tick never corrupts state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use taskpet::{CharacterRepository, DecayConfig, PushNotifier, TaskRepository, UserRepository};
use tokio::time::interval;

use super::{BondDecayJob, DeathNoticeJob, DueTomorrowReminderJob, HabitResetJob, LowBondAlertJob};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between batch runs
    pub interval: Duration,
    /// Enable/disable scheduler
    pub enabled: bool,
    pub decay: DecayConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(86400), // daily
            enabled: true,
            decay: DecayConfig::default(),
        }
    }
}

/// Daily batch scheduler
pub struct JobScheduler<C, R, U, P>
where
    C: CharacterRepository + 'static,
    R: TaskRepository + 'static,
    U: UserRepository + 'static,
    P: PushNotifier + 'static,
{
    characters: Arc<C>,
    tasks: Arc<R>,
    users: Arc<U>,
    notifier: Arc<P>,
    config: SchedulerConfig,
}

impl<C, R, U, P> JobScheduler<C, R, U, P>
where
    C: CharacterRepository + 'static,
    R: TaskRepository + 'static,
    U: UserRepository + 'static,
    P: PushNotifier + 'static,
{
    pub fn new(
        characters: Arc<C>,
        tasks: Arc<R>,
        users: Arc<U>,
        notifier: Arc<P>,
        config: Option<SchedulerConfig>,
    ) -> Self {
        Self {
            characters,
            tasks,
            users,
            notifier,
            config: config.unwrap_or_default(),
        }
    }

    /// Start the scheduler (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        if !self.config.enabled {
            tracing::info!("job scheduler disabled");
            return;
        }

        tracing::info!("job scheduler started (interval: {:?})", self.config.interval);

        let mut ticker = interval(self.config.interval);

        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.run_batch().await;
        }
    }

    /// One full batch. Order matters: decay runs before the death
    /// notices so a starvation this tick is announced this tick, and
    /// the low-bond alert sees post-decay values.
    pub async fn run_batch(&self) {
        let now = Utc::now();
        tracing::info!("batch starting");

        if let Err(e) = BondDecayJob::with_config(self.characters.clone(), self.config.decay.clone())
            .run(now)
            .await
        {
            tracing::error!("bond decay failed: {e}");
        }

        if let Err(e) = HabitResetJob::new(self.tasks.clone()).run(now).await {
            tracing::error!("habit reset failed: {e}");
        }

        if let Err(e) = DueTomorrowReminderJob::new(
            self.tasks.clone(),
            self.users.clone(),
            self.notifier.clone(),
        )
        .run(now)
        .await
        {
            tracing::error!("due reminders failed: {e}");
        }

        if let Err(e) = LowBondAlertJob::new(self.characters.clone(), self.notifier.clone())
            .run()
            .await
        {
            tracing::error!("low-bond alerts failed: {e}");
        }

        if let Err(e) = DeathNoticeJob::new(self.characters.clone(), self.notifier.clone())
            .run(now)
            .await
        {
            tracing::error!("death notices failed: {e}");
        }

        tracing::info!("batch finished");
    }
}
