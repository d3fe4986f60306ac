use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use agenda_domain::{CalendarEvent, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryEventRepo {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
}

impl InMemoryEventRepo {
    pub fn new(events: Arc<Mutex<Vec<CalendarEvent>>>) -> Self {
        Self { events }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()> {
        insert(e, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<CalendarEvent>> {
        Ok(find(event_id, &self.events))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<CalendarEvent>> {
        let mut events = find_by(&self.events, |e| e.user_id == *user_id);
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<CalendarEvent>> {
        Ok(delete(event_id, &self.events))
    }
}
