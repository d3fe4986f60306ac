use crate::error::AgendaError;
use crate::reminder::sync_reminder;
use crate::shared::{
    auth::protect_user_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use agenda_api_structs::update_task::*;
use agenda_domain::{NaiveDate, Task, TaskPriority, TaskStatus, ID};
use agenda_infra::AgendaContext;
use tracing::error;

pub async fn update_task_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<AgendaContext>,
) -> Result<HttpResponse, AgendaError> {
    let user = protect_user_route(&http_req, &path_params.user_id, &ctx).await?;

    let body = body.0;
    let usecase = UpdateTaskUseCase {
        user_id: user.id,
        task_id: path_params.task_id,
        description: body.description,
        due_date: body.due_date,
        priority: body.priority,
        status: body.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|task| HttpResponse::Ok().json(APIResponse::new(task)))
        .map_err(AgendaError::from)
}

#[derive(Debug)]
pub struct UpdateTaskUseCase {
    pub user_id: ID,
    pub task_id: ID,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyDescription,
    StorageError,
}

impl From<UseCaseError> for AgendaError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(task_id) => {
                Self::NotFound(format!("The task with id: {}, was not found.", task_id))
            }
            UseCaseError::EmptyDescription => {
                Self::BadClientData("The task description is required.".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateTaskUseCase {
    type Response = Task;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateTask";

    async fn execute(&mut self, ctx: &AgendaContext) -> Result<Self::Response, Self::Error> {
        let mut task = match ctx
            .repos
            .tasks
            .find(&self.task_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
        {
            Some(task) if task.user_id == self.user_id => task,
            _ => return Err(UseCaseError::NotFound(self.task_id)),
        };

        let description = self.description.trim();
        if description.is_empty() {
            return Err(UseCaseError::EmptyDescription);
        }
        let now = ctx.sys.now();
        task.description = description.to_string();
        task.due_date = self.due_date;
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated = now;

        let mut uow = ctx
            .repos
            .units_of_work
            .begin()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        uow.save_task(&task)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if let Err(err) = sync_reminder(uow.as_mut(), &task, now).await {
            error!(
                "Task {} is saved without an up to date reminder: {}",
                task.id, err
            );
        }
        uow.commit().await.map_err(|_| UseCaseError::StorageError)?;

        Ok(task)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::task::create_task::CreateTaskUseCase;
    use agenda_domain::{DateTime, OwningItem, Reminder, User, Utc};
    use agenda_infra::StaticTimeSys;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    async fn setup() -> (AgendaContext, Task) {
        let mut ctx = AgendaContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(now()));
        let user = User::new("ann".into(), Some("ann@example.com".into()), now());
        ctx.repos.users.insert(&user).await.unwrap();
        let task = CreateTaskUseCase {
            user,
            description: "Pay rent".into(),
            due_date: NaiveDate::from_ymd_opt(2030, 6, 2),
            priority: TaskPriority::High,
        }
        .execute(&ctx)
        .await
        .expect("To create task");

        (ctx, task)
    }

    fn usecase(task: &Task, due_date: Option<NaiveDate>) -> UpdateTaskUseCase {
        UpdateTaskUseCase {
            user_id: task.user_id,
            task_id: task.id,
            description: task.description.clone(),
            due_date,
            priority: None,
            status: None,
        }
    }

    async fn reminders(ctx: &AgendaContext, task: &Task) -> Vec<Reminder> {
        ctx.repos
            .reminders
            .find_by_item(&task.user_id, &OwningItem::Task(task.id))
            .await
            .unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn moving_due_date_replaces_the_reminder() {
        let (ctx, task) = setup().await;
        assert_eq!(reminders(&ctx, &task).await.len(), 1);

        let updated = usecase(&task, NaiveDate::from_ymd_opt(2030, 6, 5))
            .execute(&ctx)
            .await
            .expect("To update task");
        assert_eq!(updated.priority, TaskPriority::High);

        let reminders = reminders(&ctx, &task).await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(
            reminders[0].reminder_time,
            Utc.with_ymd_and_hms(2030, 6, 5, 9, 0, 0).unwrap()
        );
    }

    #[actix_web::main]
    #[test]
    async fn clearing_due_date_clears_the_reminder() {
        let (ctx, task) = setup().await;

        usecase(&task, None)
            .execute(&ctx)
            .await
            .expect("To update task");

        assert!(reminders(&ctx, &task).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn updates_status_and_priority() {
        let (ctx, task) = setup().await;
        let mut uc = usecase(&task, task.due_date);
        uc.priority = Some(TaskPriority::Low);
        uc.status = Some(TaskStatus::Completed);

        let updated = uc.execute(&ctx).await.expect("To update task");
        assert_eq!(updated.priority, TaskPriority::Low);
        assert_eq!(updated.status, TaskStatus::Completed);
        let stored = ctx.repos.tasks.find(&task.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }
}
