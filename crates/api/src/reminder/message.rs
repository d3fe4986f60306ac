use agenda_domain::{CalendarEvent, Task, User};
use agenda_infra::MailMessage;

/// The item a reminder email is about
#[derive(Debug)]
pub enum ReminderSubject {
    Event(CalendarEvent),
    Task(Task),
}

pub fn reminder_message(user: &User, recipient: &str, item: &ReminderSubject) -> MailMessage {
    match item {
        ReminderSubject::Event(e) => event_message(user, recipient, e),
        ReminderSubject::Task(task) => task_message(user, recipient, task),
    }
}

fn event_message(user: &User, recipient: &str, e: &CalendarEvent) -> MailMessage {
    let start = e.start_time.format("%Y-%m-%d %H:%M UTC");
    let end = e.end_time.format("%Y-%m-%d %H:%M UTC");
    let description = e.description.as_deref().unwrap_or("No description");

    let text_body = format!(
        "Hi {},\n\nThis is a reminder that your event \"{}\" is starting soon.\n\nStart: {}\nEnd: {}\nDescription: {}\n",
        user.username, e.title, start, end, description
    );
    let html_body = format!(
        "<p>Hi {},</p><p>This is a reminder that your event <strong>{}</strong> is starting soon.</p><ul><li>Start: {}</li><li>End: {}</li><li>Description: {}</li></ul>",
        escape_html(&user.username),
        escape_html(&e.title),
        start,
        end,
        escape_html(description)
    );

    MailMessage {
        recipient: recipient.to_string(),
        subject: format!("Event Reminder: {}", e.title),
        text_body,
        html_body,
    }
}

fn task_message(user: &User, recipient: &str, task: &Task) -> MailMessage {
    let due_date = task
        .due_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "No due date".into());

    let text_body = format!(
        "Hi {},\n\nThis is a reminder about your task:\n\n{}\n\nDue date: {}\nPriority: {}\n",
        user.username, task.description, due_date, task.priority
    );
    let html_body = format!(
        "<p>Hi {},</p><p>This is a reminder about your task:</p><blockquote>{}</blockquote><ul><li>Due date: {}</li><li>Priority: {}</li></ul>",
        escape_html(&user.username),
        escape_html(&task.description),
        due_date,
        task.priority
    );

    MailMessage {
        recipient: recipient.to_string(),
        subject: format!("Task Reminder: {}...", task.short_description()),
        text_body,
        html_body,
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod test {
    use super::*;
    use agenda_domain::{NaiveDate, TaskPriority};
    use chrono::{TimeZone, Utc};

    fn user() -> User {
        User::new("ann".into(), Some("ann@example.com".into()), Utc::now())
    }

    #[test]
    fn event_message_names_the_event() {
        let start = Utc.with_ymd_and_hms(2030, 1, 2, 10, 0, 0).unwrap();
        let e = CalendarEvent {
            id: Default::default(),
            user_id: Default::default(),
            title: "Dentist <3".into(),
            description: None,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            created: start,
            updated: start,
        };

        let msg = reminder_message(&user(), "ann@example.com", &ReminderSubject::Event(e));
        assert_eq!(msg.subject, "Event Reminder: Dentist <3");
        assert_eq!(msg.recipient, "ann@example.com");
        assert!(msg.text_body.contains("2030-01-02 10:00 UTC"));
        assert!(msg.text_body.contains("No description"));
        assert!(msg.html_body.contains("Dentist &lt;3"));
    }

    #[test]
    fn task_subject_is_shortened() {
        let now = Utc::now();
        let task = Task {
            id: Default::default(),
            user_id: Default::default(),
            description: "Prepare the quarterly report for the board meeting".into(),
            due_date: NaiveDate::from_ymd_opt(2030, 3, 4),
            priority: TaskPriority::High,
            status: Default::default(),
            created: now,
            updated: now,
        };

        let msg = reminder_message(&user(), "ann@example.com", &ReminderSubject::Task(task));
        assert_eq!(msg.subject, "Task Reminder: Prepare the quarterly report f...");
        assert!(msg.text_body.contains("Due date: 2030-03-04"));
        assert!(msg.text_body.contains("Priority: High"));
    }
}
