//! Route handlers.
//!
//! Each handler runs one `Session` operation inside `SessionStore::update`
//! and answers with a page or a 303 redirect. Validation failures are shown
//! through the session's error slot; unknown ids become `AppError` 404s.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use todo_core::{trim_name, ListId, TodoError, TodoId};

use crate::error::AppError;
use crate::store::SessionId;
use crate::views;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListNameForm {
    #[serde(default)]
    pub list_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub todo: String,
}

fn to_list(id: ListId) -> Redirect {
    Redirect::to(&format!("/lists/{id}"))
}

pub async fn index() -> Redirect {
    Redirect::to("/lists")
}

pub async fn list_lists(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Html<String> {
    let order = state.list_order;
    state
        .store
        .update(session, |data| {
            let flash = data.take_feedback();
            Html(views::lists_page(&data.list_all(order), &flash))
        })
        .await
}

pub async fn new_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Html<String> {
    state
        .store
        .update(session, |data| {
            let flash = data.take_feedback();
            Html(views::new_list_page("", &flash))
        })
        .await
}

pub async fn create_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<ListNameForm>,
) -> Response {
    state
        .store
        .update(session, |data| match data.create_list(&form.list_name) {
            Ok(id) => {
                tracing::info!(%session, list = %id, "list created");
                Redirect::to("/lists").into_response()
            }
            Err(error) => {
                tracing::debug!(%session, %error, "list rejected");
                let flash = data.take_feedback();
                let page = views::new_list_page(trim_name(&form.list_name), &flash);
                (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
            }
        })
        .await
}

pub async fn show_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(list_id): Path<ListId>,
) -> Result<Html<String>, AppError> {
    state
        .store
        .update(session, |data| -> Result<_, AppError> {
            data.find_list(list_id)?;
            let flash = data.take_feedback();
            let list = data.find_list(list_id)?;
            Ok(Html(views::list_page(list, &flash)))
        })
        .await
}

pub async fn edit_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(list_id): Path<ListId>,
) -> Result<Html<String>, AppError> {
    state
        .store
        .update(session, |data| -> Result<_, AppError> {
            data.find_list(list_id)?;
            let flash = data.take_feedback();
            let list = data.find_list(list_id)?;
            Ok(Html(views::edit_list_page(list, &list.name, &flash)))
        })
        .await
}

pub async fn update_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(list_id): Path<ListId>,
    Form(form): Form<ListNameForm>,
) -> Result<Response, AppError> {
    state
        .store
        .update(session, |data| -> Result<Response, AppError> {
            match data.rename_list(list_id, &form.list_name) {
                Ok(()) => {
                    tracing::info!(%session, list = %list_id, "list renamed");
                    Ok(to_list(list_id).into_response())
                }
                Err(error @ TodoError::NotFound(_)) => Err(error.into()),
                Err(error) => {
                    tracing::debug!(%session, list = %list_id, %error, "rename rejected");
                    let flash = data.take_feedback();
                    let list = data.find_list(list_id)?;
                    let page = views::edit_list_page(list, trim_name(&form.list_name), &flash);
                    Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response())
                }
            }
        })
        .await
}

pub async fn destroy_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(list_id): Path<ListId>,
) -> Result<Redirect, AppError> {
    state
        .store
        .update(session, |data| data.delete_list(list_id))
        .await?;
    tracing::info!(%session, list = %list_id, "list deleted");
    Ok(Redirect::to("/lists"))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(list_id): Path<ListId>,
    Form(form): Form<TodoForm>,
) -> Result<Redirect, AppError> {
    let added = state
        .store
        .update(session, |data| data.add_todo(list_id, &form.todo))
        .await;
    match added {
        Ok(todo) => tracing::info!(%session, list = %list_id, %todo, "todo added"),
        Err(error @ TodoError::NotFound(_)) => return Err(error.into()),
        Err(error) => tracing::debug!(%session, list = %list_id, %error, "todo rejected"),
    }
    Ok(to_list(list_id))
}

pub async fn destroy_todo(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path((list_id, todo_id)): Path<(ListId, TodoId)>,
) -> Result<Redirect, AppError> {
    state
        .store
        .update(session, |data| data.delete_todo(list_id, todo_id))
        .await?;
    tracing::info!(%session, list = %list_id, todo = %todo_id, "todo deleted");
    Ok(to_list(list_id))
}

pub async fn check_todo(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path((list_id, todo_id)): Path<(ListId, TodoId)>,
) -> Result<Redirect, AppError> {
    let completed = state
        .store
        .update(session, |data| data.toggle_todo(list_id, todo_id))
        .await?;
    tracing::info!(%session, list = %list_id, todo = %todo_id, completed, "todo toggled");
    Ok(to_list(list_id))
}

pub async fn complete_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(list_id): Path<ListId>,
) -> Result<Redirect, AppError> {
    state
        .store
        .update(session, |data| data.complete_all(list_id))
        .await?;
    tracing::info!(%session, list = %list_id, "all todos completed");
    Ok(to_list(list_id))
}
