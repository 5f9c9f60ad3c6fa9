use super::ITemplateRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{ReminderTemplate, ID};

pub struct InMemoryTemplateRepo {
    templates: std::sync::Mutex<Vec<ReminderTemplate>>,
}

impl InMemoryTemplateRepo {
    pub fn new() -> Self {
        Self {
            templates: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ITemplateRepo for InMemoryTemplateRepo {
    async fn insert(&self, template: &ReminderTemplate) -> anyhow::Result<()> {
        insert(template, &self.templates);
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<ReminderTemplate>> {
        Ok(find_by(&self.templates, |_| true))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ReminderTemplate>> {
        Ok(find_by(&self.templates, |t| t.user_id == *user_id))
    }
}
