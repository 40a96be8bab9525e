//! Request/response wire shapes for the `/pages` routes (§6.1).

use chrono::{DateTime, Utc};
use pagetree_db::entities::pages;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PageWithSubPages;

/// `POST /pages` body. An absent `parent_id` creates a top-level page.
#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub parent_id: Option<Uuid>,
}

/// `POST /pages` response.
#[derive(Debug, Serialize)]
pub struct CreatePageResponse {
    pub page_id: Uuid,
}

/// `GET /pages` query parameters (§4.5).
#[derive(Debug, Deserialize)]
pub struct ListPagesQuery {
    pub size: Option<u32>,
    pub created_before: Option<DateTime<Utc>>,
}

/// `GET /pages` response: every top-level page with its nested subtree.
#[derive(Debug, Serialize)]
pub struct ListPagesResponse {
    pub pages: Vec<PageWithSubPages>,
}

/// `GET /pages/:id` response.
#[derive(Debug, Serialize)]
pub struct GetPageResponse {
    pub data: pages::Model,
}

/// `PUT /pages/:id` body. No partial updates (§4.7): every field is
/// required and all four are replaced together.
#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub title_text: String,
    pub content_text: String,
    pub raw_title: serde_json::Value,
    pub raw_content: serde_json::Value,
}

/// `PUT /pages/:id`, `POST /pages/:id/reorder` response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /pages/:id/reorder` body.
#[derive(Debug, Deserialize)]
pub struct ReorderPageRequest {
    pub new_parent_id: Uuid,
}

/// `POST /pages/:id/duplicate` response.
#[derive(Debug, Serialize)]
pub struct DuplicatePageResponse {
    pub message: String,
    pub id: Uuid,
}
