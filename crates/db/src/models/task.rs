use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub use crate::types::{TaskPriority, TaskStatus};

use crate::{
    entities::{brand, task},
    models::ids,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[ts(type = "Date")]
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_by: Option<String>,
    #[ts(type = "Date")]
    pub completed_at: Option<DateTime<Utc>>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskWithBrand {
    #[serde(flatten)]
    #[ts(flatten)]
    pub task: Task,
    pub brand_name: String,
}

impl std::ops::Deref for TaskWithBrand {
    type Target = Task;
    fn deref(&self) -> &Self::Target {
        &self.task
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateTask {
    pub brand_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub created_by: Option<String>,
}

impl CreateTask {
    pub fn from_title(brand_id: Uuid, title: String) -> Self {
        Self {
            brand_id,
            title,
            description: None,
            due_date: None,
            assigned_to: None,
            status: Some(TaskStatus::Pending),
            priority: Some(TaskPriority::Medium),
            created_by: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, TS)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl Task {
    async fn from_model<C: ConnectionTrait>(db: &C, model: task::Model) -> Result<Self, DbErr> {
        let brand_id = ids::brand_uuid_by_id(db, model.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            brand_id,
            title: model.title,
            description: model.description,
            due_date: model.due_date.map(Into::into),
            assigned_to: model.assigned_to,
            status: model.status,
            priority: model.priority,
            created_by: model.created_by,
            completed_at: model.completed_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    async fn with_brand_names<C: ConnectionTrait>(
        db: &C,
        models: Vec<task::Model>,
    ) -> Result<Vec<TaskWithBrand>, DbErr> {
        let mut brand_names: HashMap<i64, String> = HashMap::new();
        let mut tasks = Vec::with_capacity(models.len());
        for model in models {
            let brand_row_id = model.brand_id;
            let brand_name = match brand_names.get(&brand_row_id) {
                Some(name) => name.clone(),
                None => {
                    let name: String = brand::Entity::find()
                        .select_only()
                        .column(brand::Column::Name)
                        .filter(brand::Column::Id.eq(brand_row_id))
                        .into_tuple()
                        .one(db)
                        .await?
                        .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;
                    brand_names.insert(brand_row_id, name.clone());
                    name
                }
            };
            tasks.push(TaskWithBrand {
                task: Self::from_model(db, model).await?,
                brand_name,
            });
        }
        Ok(tasks)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// A brand's tasks, soonest due first.
    pub async fn find_by_brand_id<C: ConnectionTrait>(
        db: &C,
        brand_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(brand_row_id) = ids::brand_id_by_uuid(db, brand_id).await? else {
            return Ok(Vec::new());
        };

        let models = task::Entity::find()
            .filter(task::Column::BrandId.eq(brand_row_id))
            .order_by_asc(task::Column::DueDate)
            .all(db)
            .await?;

        let mut tasks = Vec::with_capacity(models.len());
        for model in models {
            tasks.push(Self::from_model(db, model).await?);
        }
        Ok(tasks)
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let models = task::Entity::find()
            .order_by_asc(task::Column::DueDate)
            .all(db)
            .await?;

        let mut tasks = Vec::with_capacity(models.len());
        for model in models {
            tasks.push(Self::from_model(db, model).await?);
        }
        Ok(tasks)
    }

    /// Open tasks (pending or in progress) across every brand, soonest due
    /// first.
    pub async fn find_upcoming<C: ConnectionTrait>(
        db: &C,
        limit: u64,
    ) -> Result<Vec<TaskWithBrand>, DbErr> {
        let models = task::Entity::find()
            .filter(task::Column::Status.is_in([TaskStatus::Pending, TaskStatus::InProgress]))
            .order_by_asc(task::Column::DueDate)
            .limit(limit)
            .all(db)
            .await?;
        Self::with_brand_names(db, models).await
    }

    /// Open tasks whose due date has already passed.
    pub async fn find_overdue<C: ConnectionTrait>(
        db: &C,
        now: DateTime<Utc>,
    ) -> Result<Vec<TaskWithBrand>, DbErr> {
        let models = task::Entity::find()
            .filter(task::Column::Status.is_in([TaskStatus::Pending, TaskStatus::InProgress]))
            .filter(task::Column::DueDate.lt(now))
            .order_by_asc(task::Column::DueDate)
            .all(db)
            .await?;
        Self::with_brand_names(db, models).await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateTask,
        task_id: Uuid,
    ) -> Result<Self, DbErr> {
        let brand_row_id = ids::brand_id_by_uuid(db, data.brand_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Brand not found".to_string()))?;

        let now = Utc::now();
        let active = task::ActiveModel {
            uuid: Set(task_id),
            brand_id: Set(brand_row_id),
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            due_date: Set(data.due_date.map(Into::into)),
            assigned_to: Set(data.assigned_to.clone()),
            status: Set(data.status.clone().unwrap_or_default()),
            priority: Set(data.priority.clone().unwrap_or_default()),
            created_by: Set(data.created_by.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Self::from_model(db, model).await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Self, DbErr> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Task not found".to_string()))?;

        let mut active: task::ActiveModel = record.into();
        if let Some(title) = data.title.clone() {
            active.title = Set(title);
        }
        if let Some(description) = data.description.clone() {
            active.description = Set(Some(description));
        }
        if let Some(due_date) = data.due_date {
            active.due_date = Set(Some(due_date.into()));
        }
        if let Some(assigned_to) = data.assigned_to.clone() {
            active.assigned_to = Set(Some(assigned_to));
        }
        if let Some(status) = data.status.clone() {
            // Keep completed_at consistent with explicit status edits too.
            match status {
                TaskStatus::Completed => {
                    active.completed_at = Set(Some(Utc::now().into()));
                }
                _ => {
                    active.completed_at = Set(None);
                }
            }
            active.status = Set(status);
        }
        if let Some(priority) = data.priority.clone() {
            active.priority = Set(priority);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await
    }

    /// Flips a task between open and completed. Completing stamps
    /// `completed_at`; reopening clears it. Cancelled tasks stay cancelled.
    pub async fn toggle_completion<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Self, DbErr> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Task not found".to_string()))?;

        let now = Utc::now();
        let mut active: task::ActiveModel = record.clone().into();
        match record.status {
            TaskStatus::Pending | TaskStatus::InProgress => {
                active.status = Set(TaskStatus::Completed);
                active.completed_at = Set(Some(now.into()));
            }
            TaskStatus::Completed => {
                active.status = Set(TaskStatus::Pending);
                active.completed_at = Set(None);
            }
            TaskStatus::Cancelled => {
                return Err(DbErr::Custom(
                    "Cancelled tasks cannot be toggled".to_string(),
                ));
            }
        }
        active.updated_at = Set(now.into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = task::Entity::delete_many()
            .filter(task::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::models::brand::{Brand, CreateBrand};

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn make_brand(db: &sea_orm::DatabaseConnection, name: &str) -> Brand {
        Brand::create(
            db,
            &CreateBrand {
                name: name.to_string(),
                ..Default::default()
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn toggle_flips_status_and_completed_at() {
        let db = setup_db().await;
        let brand = make_brand(&db, "Brand").await;

        let task = Task::create(
            &db,
            &CreateTask::from_title(brand.id, "Send samples".to_string()),
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.completed_at.is_none());

        let completed = Task::toggle_completion(&db, task.id).await.unwrap();
        assert_eq!(completed.status, TaskStatus::Completed);
        assert!(completed.completed_at.is_some());

        let reopened = Task::toggle_completion(&db, task.id).await.unwrap();
        assert_eq!(reopened.status, TaskStatus::Pending);
        assert!(reopened.completed_at.is_none());
    }

    #[tokio::test]
    async fn toggle_rejects_cancelled_tasks() {
        let db = setup_db().await;
        let brand = make_brand(&db, "Brand").await;

        let task = Task::create(
            &db,
            &CreateTask {
                status: Some(TaskStatus::Cancelled),
                ..CreateTask::from_title(brand.id, "Dead".to_string())
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        assert!(Task::toggle_completion(&db, task.id).await.is_err());
    }

    #[tokio::test]
    async fn upcoming_excludes_closed_and_orders_by_due_date() {
        let db = setup_db().await;
        let brand = make_brand(&db, "Brand").await;

        let now = Utc::now();
        let later = Task::create(
            &db,
            &CreateTask {
                due_date: Some(now + Duration::days(5)),
                ..CreateTask::from_title(brand.id, "Later".to_string())
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let soon = Task::create(
            &db,
            &CreateTask {
                due_date: Some(now + Duration::days(1)),
                status: Some(TaskStatus::InProgress),
                ..CreateTask::from_title(brand.id, "Soon".to_string())
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let done = Task::create(
            &db,
            &CreateTask {
                due_date: Some(now + Duration::days(2)),
                ..CreateTask::from_title(brand.id, "Done".to_string())
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        Task::toggle_completion(&db, done.id).await.unwrap();

        let upcoming = Task::find_upcoming(&db, 10).await.unwrap();
        let ids: Vec<_> = upcoming.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![soon.id, later.id]);
        assert_eq!(upcoming[0].brand_name, "Brand");
    }

    #[tokio::test]
    async fn overdue_requires_past_due_date() {
        let db = setup_db().await;
        let brand = make_brand(&db, "Brand").await;

        let now = Utc::now();
        let overdue = Task::create(
            &db,
            &CreateTask {
                due_date: Some(now - Duration::days(3)),
                ..CreateTask::from_title(brand.id, "Late".to_string())
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        Task::create(
            &db,
            &CreateTask {
                due_date: Some(now + Duration::days(3)),
                ..CreateTask::from_title(brand.id, "Future".to_string())
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        // No due date: never overdue.
        Task::create(
            &db,
            &CreateTask::from_title(brand.id, "Someday".to_string()),
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let late = Task::find_overdue(&db, now).await.unwrap();
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].id, overdue.id);
    }
}
