//! Task operations over a [`TaskStore`].

use std::sync::Arc;

use uuid::Uuid;

use super::errors::TaskResult;
use super::models::{NewTask, Task, TaskUpdate};
use crate::db::repository::TaskStore;

pub struct TaskManager {
    store: Arc<dyn TaskStore>,
}

impl TaskManager {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Create a task with a server-assigned id.
    pub async fn add(&self, user_id: Uuid, new_task: NewTask) -> TaskResult<Task> {
        let task = Task {
            task_id: Uuid::new_v4(),
            title: new_task.title,
            description: new_task.description,
            due_date: new_task.due_date,
            status: new_task.status,
        };
        self.store.insert(user_id, &task).await?;
        Ok(task)
    }

    /// All tasks belonging to a user.
    pub async fn tasks(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        self.store.tasks_for_user(user_id).await
    }

    /// Replace a task's fields. `None` means no task with that id belongs
    /// to this user.
    pub async fn edit(&self, user_id: Uuid, update: TaskUpdate) -> TaskResult<Option<Task>> {
        self.store.update(user_id, &update).await
    }

    /// Delete a task; returns whether it existed.
    pub async fn remove(&self, user_id: Uuid, task_id: Uuid) -> TaskResult<bool> {
        self.store.remove(user_id, task_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::mock::MemoryTaskStore;
    use crate::tasks::models::TaskStatus;

    fn manager() -> TaskManager {
        TaskManager::new(Arc::new(MemoryTaskStore::new()))
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: "desc".to_string(),
            due_date: "2026-09-01".to_string(),
            status: TaskStatus::Pending,
        }
    }

    #[tokio::test]
    async fn add_list_edit_remove() {
        let manager = manager();
        let user = Uuid::new_v4();

        let task = manager.add(user, new_task("Read Dune")).await.unwrap();
        assert_eq!(manager.tasks(user).await.unwrap().len(), 1);

        let edited = manager
            .edit(
                user,
                TaskUpdate {
                    task_id: task.task_id,
                    title: "Read Dune".to_string(),
                    description: "finished".to_string(),
                    due_date: task.due_date.clone(),
                    status: TaskStatus::Completed,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.status, TaskStatus::Completed);
        assert_eq!(edited.description, "finished");

        assert!(manager.remove(user, task.task_id).await.unwrap());
        assert!(!manager.remove(user, task.task_id).await.unwrap());
        assert!(manager.tasks(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_unknown_task_is_none() {
        let manager = manager();
        let user = Uuid::new_v4();
        let result = manager
            .edit(
                user,
                TaskUpdate {
                    task_id: Uuid::new_v4(),
                    title: "x".to_string(),
                    description: "y".to_string(),
                    due_date: "2026-09-01".to_string(),
                    status: TaskStatus::Pending,
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn tasks_are_scoped_to_their_owner() {
        let manager = manager();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let task = manager.add(alice, new_task("Alice's task")).await.unwrap();
        assert!(manager.tasks(bob).await.unwrap().is_empty());
        assert!(!manager.remove(bob, task.task_id).await.unwrap());
        assert!(
            manager
                .edit(
                    bob,
                    TaskUpdate {
                        task_id: task.task_id,
                        title: "hijack".to_string(),
                        description: String::new(),
                        due_date: String::new(),
                        status: TaskStatus::Pending,
                    },
                )
                .await
                .unwrap()
                .is_none()
        );
    }
}
