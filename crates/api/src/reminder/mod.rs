mod get_item_reminders;
mod message;
mod send_reminders;
mod sync_reminder;

use actix_web::web;
use get_item_reminders::{get_event_reminders_controller, get_task_reminders_controller};
use send_reminders::send_reminders_controller;

pub use send_reminders::{dispatch_reminders, DispatchError, DispatchReport};
pub use sync_reminder::sync_reminder;

#[cfg(test)]
pub(crate) use sync_reminder::test::BrokenRemindersUnitOfWorkRepo;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/events/{event_id}/reminders",
        web::get().to(get_event_reminders_controller),
    );
    cfg.route(
        "/users/{user_id}/tasks/{task_id}/reminders",
        web::get().to(get_task_reminders_controller),
    );
    cfg.route("/reminders/dispatch", web::post().to(send_reminders_controller));
}
