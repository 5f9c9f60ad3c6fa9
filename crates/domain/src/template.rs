use crate::{
    recurrence::{RecurrenceRule, TimeOfDay},
    shared::entity::{Entity, ID},
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// A standing rule owned by a `User` that produces one `Occurrence`
/// on every local calendar day the `RecurrenceRule` is due.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderTemplate {
    pub id: ID,
    pub user_id: ID,
    pub message: String,
    pub rule: RecurrenceRule,
    pub time_of_day: TimeOfDay,
    /// First day the template can fire. Monthly rules repeat on its day of month
    pub anchor_date: NaiveDate,
    pub created: i64,
}

impl ReminderTemplate {
    pub fn new(
        user_id: ID,
        message: String,
        rule: RecurrenceRule,
        time_of_day: TimeOfDay,
        anchor_date: NaiveDate,
        created: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            message,
            rule,
            time_of_day,
            anchor_date,
            created,
        }
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        date >= self.anchor_date && self.rule.is_due_on(self.anchor_date, date)
    }

    pub fn slot_on(&self, date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
        self.time_of_day.on(date, tz)
    }

    pub fn describe(&self) -> String {
        format!(
            "{} at {}",
            self.rule.describe(self.anchor_date),
            self.time_of_day
        )
    }
}

impl Entity for ReminderTemplate {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::RecurrenceKind;
    use chrono_tz::Europe::Oslo;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(rule: RecurrenceRule, time: &str, anchor: NaiveDate) -> ReminderTemplate {
        ReminderTemplate::new(
            ID::default(),
            "Water the plants".into(),
            rule,
            time.parse().unwrap(),
            anchor,
            0,
        )
    }

    #[test]
    fn weekly_template_on_wednesday() {
        let rule = RecurrenceRule::new(RecurrenceKind::Weekly, vec![1, 3, 5]).unwrap();
        let t = template(rule, "18:00", date(2021, 2, 1));
        let wednesday = date(2021, 2, 17);
        assert!(t.is_due_on(wednesday));
        assert_eq!(t.slot_on(wednesday, &Oslo).timestamp_millis(), 1613581200000);
        assert_eq!(t.describe(), "every Mon, Wed, Fri at 18:00");
    }

    #[test]
    fn is_not_due_before_anchor_date() {
        let t = template(RecurrenceRule::daily(), "09:00", date(2021, 2, 17));
        assert!(!t.is_due_on(date(2021, 2, 16)));
        assert!(t.is_due_on(date(2021, 2, 17)));
        assert!(t.is_due_on(date(2021, 2, 18)));
    }

    #[test]
    fn monthly_template_anchored_to_31st() {
        let rule = RecurrenceRule::new(RecurrenceKind::Monthly, vec![]).unwrap();
        let t = template(rule, "09:00", date(2021, 1, 31));
        assert!(!t.is_due_on(date(2021, 4, 30)));
        assert!(t.is_due_on(date(2021, 3, 31)));
    }
}
