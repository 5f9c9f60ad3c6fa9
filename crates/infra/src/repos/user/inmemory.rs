use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use nudge_domain::{User, ID};

pub struct InMemoryUserRepo {
    users: std::sync::Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn upsert(&self, address: &str, created: i64) -> anyhow::Result<User> {
        let mut users = lock(&self.users);
        if let Some(user) = users.iter().find(|u| u.address == address) {
            return Ok(user.clone());
        }
        let user = User::new(address.to_string(), created);
        users.push(user.clone());
        Ok(user)
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        Ok(find(user_id, &self.users))
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        Ok(find_by(&self.users, |u| user_ids.contains(&u.id)))
    }
}
