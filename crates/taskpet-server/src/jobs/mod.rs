//! Scheduled Batch Jobs

mod bond_decay;
mod habit_reset;
mod notify;
mod scheduler;

pub use bond_decay::BondDecayJob;
pub use habit_reset::HabitResetJob;
pub use notify::{DeathNoticeJob, DueTomorrowReminderJob, LowBondAlertJob, LOW_BOND};
pub use scheduler::{JobScheduler, SchedulerConfig};
