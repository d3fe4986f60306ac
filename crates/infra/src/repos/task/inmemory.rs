use super::ITaskRepo;
use crate::repos::shared::inmemory_repo::*;
use agenda_domain::{Task, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryTaskRepo {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl InMemoryTaskRepo {
    pub fn new(tasks: Arc<Mutex<Vec<Task>>>) -> Self {
        Self { tasks }
    }
}

#[async_trait::async_trait]
impl ITaskRepo for InMemoryTaskRepo {
    async fn insert(&self, task: &Task) -> anyhow::Result<()> {
        insert(task, &self.tasks);
        Ok(())
    }

    async fn save(&self, task: &Task) -> anyhow::Result<()> {
        save(task, &self.tasks);
        Ok(())
    }

    async fn find(&self, task_id: &ID) -> anyhow::Result<Option<Task>> {
        Ok(find(task_id, &self.tasks))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Task>> {
        let mut tasks = find_by(&self.tasks, |t| t.user_id == *user_id);
        // Undated tasks last, like NULLS LAST in postgres
        tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.created));
        Ok(tasks)
    }

    async fn delete(&self, task_id: &ID) -> anyhow::Result<Option<Task>> {
        Ok(delete(task_id, &self.tasks))
    }
}
