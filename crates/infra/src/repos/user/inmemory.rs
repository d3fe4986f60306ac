use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use agenda_domain::{User, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryUserRepo {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepo {
    pub fn new(users: Arc<Mutex<Vec<User>>>) -> Self {
        Self { users }
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        insert(user, &self.users);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        Ok(find(user_id, &self.users))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(find_by(&self.users, |u| u.username == username).pop())
    }

    async fn delete(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        Ok(delete(user_id, &self.users))
    }
}
