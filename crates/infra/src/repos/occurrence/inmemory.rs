use super::{IOccurrenceRepo, InsertOccurrenceError};
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{Occurrence, ID};

pub struct InMemoryOccurrenceRepo {
    occurrences: std::sync::Mutex<Vec<Occurrence>>,
}

impl InMemoryOccurrenceRepo {
    pub fn new() -> Self {
        Self {
            occurrences: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IOccurrenceRepo for InMemoryOccurrenceRepo {
    async fn insert(&self, occurrence: &Occurrence) -> Result<(), InsertOccurrenceError> {
        let mut occurrences = lock(&self.occurrences);
        if let (Some(template_id), Some(date)) = (&occurrence.template_id, occurrence.slot_date) {
            let taken = occurrences.iter().any(|o| {
                o.template_id.as_ref() == Some(template_id) && o.slot_date == Some(date)
            });
            if taken {
                return Err(InsertOccurrenceError::Duplicate {
                    template_id: template_id.clone(),
                    date,
                });
            }
        }
        occurrences.push(occurrence.clone());
        Ok(())
    }

    async fn find(&self, occurrence_id: &ID) -> anyhow::Result<Option<Occurrence>> {
        Ok(find(occurrence_id, &self.occurrences))
    }

    async fn find_by_template_between(
        &self,
        template_id: &ID,
        start: i64,
        end: i64,
    ) -> anyhow::Result<Vec<Occurrence>> {
        Ok(find_by(&self.occurrences, |o| {
            o.template_id.as_ref() == Some(template_id) && o.remind_at >= start && o.remind_at <= end
        }))
    }

    async fn find_due(&self, now: i64) -> anyhow::Result<Vec<Occurrence>> {
        let mut due = find_by(&self.occurrences, |o| o.is_due(now));
        due.sort_by_key(|o| o.remind_at);
        Ok(due)
    }

    async fn find_pending_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Occurrence>> {
        let mut pending = find_by(&self.occurrences, |o| !o.delivered && o.user_id == *user_id);
        pending.sort_by_key(|o| o.remind_at);
        Ok(pending)
    }

    async fn mark_delivered(&self, occurrence_id: &ID) -> anyhow::Result<()> {
        let updated = update_many(
            &self.occurrences,
            |o| o.id == *occurrence_id,
            |o| o.delivered = true,
        );
        if updated == 0 {
            return Err(anyhow::anyhow!("Occurrence {} not found", occurrence_id));
        }
        Ok(())
    }
}
