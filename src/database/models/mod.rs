pub mod caregiver;
pub mod client;
pub mod daily_log;
pub mod profile;

pub use caregiver::{Caregiver, CaregiverChanges, NewCaregiver};
pub use client::{Client, ClientChanges, ClientDetails, ClientSummary, NewClient};
pub use daily_log::{DailyLog, LogDraft, LogEntry, LogFilter, LogScope};
pub use profile::{NewProfile, Profile, ProfileChanges};
