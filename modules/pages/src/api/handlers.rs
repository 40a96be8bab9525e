//! Route handlers: request decoding, delegation to [`PagesService`], and
//! DTO mapping (§4.8). Status-code mapping happens in `pagetree_errors`'s
//! `IntoResponse` impl for `ApiError` — handlers only ever return
//! `Result<_, ApiError>`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagetree_auth::AuthUser;
use pagetree_errors::ApiError;
use uuid::Uuid;

use super::dto::{
    CreatePageRequest, CreatePageResponse, DuplicatePageResponse, GetPageResponse, ListPagesQuery,
    ListPagesResponse, MessageResponse, ReorderPageRequest, UpdatePageRequest,
};
use super::state::PagesState;

pub async fn create_page<S: PagesState>(
    State(state): State<S>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreatePageRequest>,
) -> Result<Json<CreatePageResponse>, ApiError> {
    let page_id = state.pages_service().create_page(user_id, body.parent_id).await?;
    Ok(Json(CreatePageResponse { page_id }))
}

pub async fn list_pages<S: PagesState>(
    State(state): State<S>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListPagesQuery>,
) -> Result<Json<ListPagesResponse>, ApiError> {
    let pages = state
        .pages_service()
        .list_pages(user_id, query.size, query.created_before)
        .await?;
    Ok(Json(ListPagesResponse { pages }))
}

pub async fn get_page<S: PagesState>(
    State(state): State<S>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
) -> Result<Json<GetPageResponse>, ApiError> {
    let page = state.pages_service().get_page(user_id, page_id).await?;
    Ok(Json(GetPageResponse { data: page }))
}

pub async fn update_page<S: PagesState>(
    State(state): State<S>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
    Json(body): Json<UpdatePageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .pages_service()
        .update_page(
            user_id,
            page_id,
            Some(body.title_text),
            Some(body.content_text),
            Some(body.raw_title),
            Some(body.raw_content),
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "page updated".to_owned(),
    }))
}

pub async fn delete_page<S: PagesState>(
    State(state): State<S>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.pages_service().delete_page(user_id, page_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_page<S: PagesState>(
    State(state): State<S>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
    Json(body): Json<ReorderPageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .pages_service()
        .reorder_page(user_id, page_id, body.new_parent_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "page reordered".to_owned(),
    }))
}

pub async fn duplicate_page<S: PagesState>(
    State(state): State<S>,
    AuthUser(user_id): AuthUser,
    Path(page_id): Path<Uuid>,
) -> Result<Json<DuplicatePageResponse>, ApiError> {
    let new_id = state.pages_service().duplicate_page(user_id, page_id).await?;
    Ok(Json(DuplicatePageResponse {
        message: "page duplicated".to_owned(),
        id: new_id,
    }))
}
