mod date;
mod intent;
mod occurrence;
mod recurrence;
mod shared;
mod sweep;
mod template;
mod user;

pub use chrono::NaiveDate;
pub use chrono_tz::Tz;
pub use date::{day_bounds, format_local, local_date, resolve_local};
pub use intent::{Automation, ClassificationError, Intent, RawIntent};
pub use occurrence::Occurrence;
pub use recurrence::{
    InvalidRecurrenceError, InvalidTimeOfDayError, RecurrenceKind, RecurrenceRule, TimeOfDay,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use sweep::{SweepError, SweepErrorScope, SweepReport};
pub use template::ReminderTemplate;
pub use user::User;
