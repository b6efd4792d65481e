//! Task API handlers.
//!
//! All routes here sit behind the auth gate. Status strings are validated
//! by hand so a bad value gets a 400 with a useful message rather than a
//! generic body rejection.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookstack::auth::TokenPayload;
use bookstack::tasks::{NewTask, Task, TaskError, TaskStatus, TaskUpdate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, MessageResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskPayload {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskPayload {
    pub task_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub message: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: String,
    pub task: Task,
}

fn task_error(err: TaskError) -> (StatusCode, Json<MessageResponse>) {
    tracing::error!(error = %err, "task request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new("Internal Server Error")),
    )
}

fn invalid_status() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(MessageResponse::new(
            "Invalid status. Status must be \"pending\" or \"completed\"",
        )),
    )
}

/// List the caller's tasks. An empty list is a 200, not an error.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(payload): Extension<TokenPayload>,
) -> Result<Json<TasksResponse>, (StatusCode, Json<MessageResponse>)> {
    let tasks = state
        .tasks
        .tasks(payload.user_id)
        .await
        .map_err(task_error)?;

    let message = if tasks.is_empty() {
        "No tasks found for user"
    } else {
        "Tasks fetched successfully"
    };

    Ok(Json(TasksResponse {
        message: message.to_string(),
        tasks,
    }))
}

/// Create a task for the caller. The id is assigned server-side and
/// returned in the response.
///
/// # Errors
///
/// - `400 Bad Request`: status is not `pending` or `completed`
pub async fn add_task(
    State(state): State<AppState>,
    Extension(payload): Extension<TokenPayload>,
    Json(body): Json<AddTaskPayload>,
) -> Result<(StatusCode, Json<TaskResponse>), (StatusCode, Json<MessageResponse>)> {
    let Some(status) = TaskStatus::parse(&body.status) else {
        return Err(invalid_status());
    };

    let task = state
        .tasks
        .add(
            payload.user_id,
            NewTask {
                title: body.title,
                description: body.description,
                due_date: body.due_date,
                status,
            },
        )
        .await
        .map_err(task_error)?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task added successfully".to_string(),
            task,
        }),
    ))
}

/// Replace all fields of one of the caller's tasks.
///
/// Returns `200` with the updated task, `204` when no task with that id
/// belongs to the caller.
pub async fn edit_task(
    State(state): State<AppState>,
    Extension(payload): Extension<TokenPayload>,
    Json(body): Json<EditTaskPayload>,
) -> Result<Response, (StatusCode, Json<MessageResponse>)> {
    let Some(status) = TaskStatus::parse(&body.status) else {
        return Err(invalid_status());
    };

    let updated = state
        .tasks
        .edit(
            payload.user_id,
            TaskUpdate {
                task_id: body.task_id,
                title: body.title,
                description: body.description,
                due_date: body.due_date,
                status,
            },
        )
        .await
        .map_err(task_error)?;

    match updated {
        Some(task) => Ok(Json(TaskResponse {
            message: "Task updated successfully".to_string(),
            task,
        })
        .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Delete one of the caller's tasks.
///
/// Returns `200` with a message when the task existed, `204` otherwise.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(payload): Extension<TokenPayload>,
    Path(task_id): Path<Uuid>,
) -> Result<Response, (StatusCode, Json<MessageResponse>)> {
    let removed = state
        .tasks
        .remove(payload.user_id, task_id)
        .await
        .map_err(task_error)?;

    if removed {
        Ok((
            StatusCode::OK,
            Json(MessageResponse::new("Task deleted successfully")),
        )
            .into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
