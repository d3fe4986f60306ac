use super::{IUnitOfWork, IUnitOfWorkRepo};
use crate::repos::shared::inmemory_repo::*;
use agenda_domain::{CalendarEvent, OwningItem, Reminder, SentStatus, Task, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryUnitOfWorkRepo {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    tasks: Arc<Mutex<Vec<Task>>>,
    reminders: Arc<Mutex<Vec<Reminder>>>,
}

impl InMemoryUnitOfWorkRepo {
    pub fn new(
        events: Arc<Mutex<Vec<CalendarEvent>>>,
        tasks: Arc<Mutex<Vec<Task>>>,
        reminders: Arc<Mutex<Vec<Reminder>>>,
    ) -> Self {
        Self {
            events,
            tasks,
            reminders,
        }
    }
}

#[async_trait::async_trait]
impl IUnitOfWorkRepo for InMemoryUnitOfWorkRepo {
    async fn begin(&self) -> anyhow::Result<Box<dyn IUnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            events: self.events.clone(),
            tasks: self.tasks.clone(),
            reminders: self.reminders.clone(),
            changes: Vec::new(),
        }))
    }
}

enum Change {
    InsertEvent(CalendarEvent),
    SaveEvent(CalendarEvent),
    InsertTask(Task),
    SaveTask(Task),
    DeletePendingReminders(ID, OwningItem),
    InsertReminder(Reminder),
}

/// Buffers its writes and applies them to the shared collections on commit
pub struct InMemoryUnitOfWork {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    tasks: Arc<Mutex<Vec<Task>>>,
    reminders: Arc<Mutex<Vec<Reminder>>>,
    changes: Vec<Change>,
}

fn is_pending_of(r: &Reminder, user_id: &ID, item: &OwningItem) -> bool {
    r.user_id == *user_id && r.item == *item && r.sent_status == SentStatus::Pending
}

#[async_trait::async_trait]
impl IUnitOfWork for InMemoryUnitOfWork {
    async fn insert_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()> {
        self.changes.push(Change::InsertEvent(e.clone()));
        Ok(())
    }

    async fn save_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()> {
        self.changes.push(Change::SaveEvent(e.clone()));
        Ok(())
    }

    async fn insert_task(&mut self, task: &Task) -> anyhow::Result<()> {
        self.changes.push(Change::InsertTask(task.clone()));
        Ok(())
    }

    async fn save_task(&mut self, task: &Task) -> anyhow::Result<()> {
        self.changes.push(Change::SaveTask(task.clone()));
        Ok(())
    }

    async fn delete_pending_reminders(
        &mut self,
        user_id: &ID,
        item: &OwningItem,
    ) -> anyhow::Result<u64> {
        let stored = find_by(&self.reminders, |r| is_pending_of(r, user_id, item)).len();
        let staged_before = self.changes.len();
        self.changes.retain(|change| match change {
            Change::InsertReminder(r) => !is_pending_of(r, user_id, item),
            _ => true,
        });
        let staged = staged_before - self.changes.len();
        self.changes
            .push(Change::DeletePendingReminders(*user_id, *item));
        Ok((stored + staged) as u64)
    }

    async fn insert_reminder(&mut self, reminder: &Reminder) -> anyhow::Result<()> {
        self.changes.push(Change::InsertReminder(reminder.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let InMemoryUnitOfWork {
            events,
            tasks,
            reminders,
            changes,
        } = *self;
        let mut events = events.lock().unwrap();
        let mut tasks = tasks.lock().unwrap();
        let mut reminders = reminders.lock().unwrap();
        for change in changes {
            match change {
                Change::InsertEvent(e) => events.push(e),
                Change::SaveEvent(e) => save_locked(&e, &mut events),
                Change::InsertTask(t) => tasks.push(t),
                Change::SaveTask(t) => save_locked(&t, &mut tasks),
                Change::DeletePendingReminders(user_id, item) => {
                    find_and_delete_by_locked(&mut reminders, |r| {
                        is_pending_of(r, &user_id, &item)
                    });
                }
                Change::InsertReminder(r) => reminders.push(r),
            }
        }
        Ok(())
    }
}
