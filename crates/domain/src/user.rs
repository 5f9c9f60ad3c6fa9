use crate::shared::entity::{Entity, ID};

/// Someone talking to the assistant over the chat channel
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    /// Channel address, e.g. a phone number or chat id. Unique per `User`
    pub address: String,
    pub created: i64,
}

impl User {
    pub fn new(address: String, created: i64) -> Self {
        Self {
            id: Default::default(),
            address,
            created,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
