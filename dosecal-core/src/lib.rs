//! Core engine for dosecal.
//!
//! This crate turns medication records into dated reminder events and pushes
//! them, in size-limited batches, through a calendar gateway:
//! - `frequency` decodes dose-frequency codes into per-slot daily doses
//! - `schedule` expands one record into its full multi-day event set
//! - `batch` accumulates operations and submits them a batch at a time
//! - `service` orchestrates creation and bulk-deletion runs
//!
//! Network access lives behind the `gateway` traits; this crate does no I/O
//! of its own.

pub mod batch;
pub mod error;
pub mod frequency;
pub mod gateway;
pub mod medication;
pub mod schedule;
pub mod service;
pub mod slot;

pub use batch::{BatchDispatcher, BatchSink, ItemOutcome, MAX_BATCH_SIZE};
pub use error::{ReminderError, ReminderResult};
pub use frequency::{DailyDoses, parse_frequency};
pub use gateway::{Authenticator, BatchOperation, CalendarGateway, Credential, EventRef};
pub use medication::MedicationRecord;
pub use schedule::{ReminderEvent, TITLE_PREFIX};
pub use service::{ReminderService, RunSummary};
pub use slot::{CALENDAR_TZ, DoseSlot};
