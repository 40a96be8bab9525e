//! `PagesService`: wraps the closure engine with per-request deadlines,
//! transaction ownership, and DTO conversion (§4.8, §4.9, §5).
//!
//! A transaction handle is exclusively owned by the method that opens it
//! (§9). `sea_orm::DatabaseTransaction` rolls back on drop when not
//! committed, so the early-return `?` on any engine error is sufficient —
//! there is no separate rollback path to maintain.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pagetree_db::Db;
use pagetree_db::entities::pages;
use pagetree_errors::ApiError;
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, TransactionTrait};
use uuid::Uuid;

use super::closure;
use super::tree::{self, ClosureRow, PageNode};

const SIMPLE_DEADLINE: Duration = Duration::from_secs(2);
const DUPLICATE_DEADLINE: Duration = Duration::from_secs(5);

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Tunables for the domain service (§4.5, §4.3.5).
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub spacing: f64,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            spacing: 1000.0,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Clamps a caller-supplied page size into `1..=max_page_size`,
    /// defaulting to `default_page_size` when absent (§4.5).
    #[must_use]
    pub fn clamp_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

/// One top-level page with its nested subtree, as returned by `GetPages`
/// (§6.1: `{pages: [{page, sub_pages}]}`).
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageWithSubPages {
    pub page: pages::Model,
    pub sub_pages: Vec<PageNode>,
}

async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, ApiError>
where
    F: std::future::Future<Output = Result<T, ApiError>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| ApiError::internal("request deadline exceeded"))?
}

pub struct PagesService {
    db: Db,
    config: ServiceConfig,
}

impl PagesService {
    #[must_use]
    pub fn new(db: Db, config: ServiceConfig) -> Self {
        Self { db, config }
    }

    /// §4.3.1.
    pub async fn create_page(&self, user_id: i64, parent_id: Option<Uuid>) -> Result<Uuid, ApiError> {
        with_deadline(SIMPLE_DEADLINE, async {
            let txn = self
                .db
                .connection()
                .begin()
                .await
                .map_err(|e| ApiError::internal_with("failed to start transaction", e))?;
            let id = closure::create_page(&txn, user_id, parent_id, self.config.spacing).await?;
            txn.commit()
                .await
                .map_err(|e| ApiError::internal_with("failed to commit transaction", e))?;
            Ok(id)
        })
        .await
    }

    /// §4.3.2.
    pub async fn delete_page(&self, user_id: i64, page_id: Uuid) -> Result<(), ApiError> {
        with_deadline(SIMPLE_DEADLINE, async {
            let txn = self
                .db
                .connection()
                .begin()
                .await
                .map_err(|e| ApiError::internal_with("failed to start transaction", e))?;
            closure::delete_page(&txn, user_id, page_id).await?;
            txn.commit()
                .await
                .map_err(|e| ApiError::internal_with("failed to commit transaction", e))?;
            Ok(())
        })
        .await
    }

    /// §4.3.3.
    pub async fn reorder_page(&self, user_id: i64, page_id: Uuid, new_parent_id: Uuid) -> Result<(), ApiError> {
        with_deadline(SIMPLE_DEADLINE, async {
            let txn = self
                .db
                .connection()
                .begin()
                .await
                .map_err(|e| ApiError::internal_with("failed to start transaction", e))?;
            closure::reorder_page(&txn, user_id, page_id, new_parent_id).await?;
            txn.commit()
                .await
                .map_err(|e| ApiError::internal_with("failed to commit transaction", e))?;
            Ok(())
        })
        .await
    }

    /// §4.3.4.
    pub async fn duplicate_page(&self, user_id: i64, page_id: Uuid) -> Result<Uuid, ApiError> {
        with_deadline(DUPLICATE_DEADLINE, async {
            let txn = self
                .db
                .connection()
                .begin()
                .await
                .map_err(|e| ApiError::internal_with("failed to start transaction", e))?;
            let new_id = closure::duplicate_page(&txn, user_id, page_id, self.config.spacing).await?;
            txn.commit()
                .await
                .map_err(|e| ApiError::internal_with("failed to commit transaction", e))?;
            Ok(new_id)
        })
        .await
    }

    /// §4.6. Executed in a read-only transaction; ownership mismatch and
    /// absence are both NotFound (do not leak existence).
    pub async fn get_page(&self, user_id: i64, page_id: Uuid) -> Result<pages::Model, ApiError> {
        with_deadline(SIMPLE_DEADLINE, async {
            let txn = self
                .db
                .begin_readonly()
                .await
                .map_err(|e| ApiError::internal_with("failed to start read-only transaction", e))?;
            match pages::Entity::find_by_id(page_id).one(&txn).await {
                Ok(Some(page)) if page.created_by == user_id => Ok(page),
                Ok(Some(_) | None) => Err(ApiError::not_found("page not found")),
                Err(e) => Err(ApiError::internal_with("failed to read page", e)),
            }
        })
        .await
    }

    /// §4.7. Zero rows affected maps to NotFound.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_page(
        &self,
        user_id: i64,
        page_id: Uuid,
        text_title: Option<String>,
        text_content: Option<String>,
        title: Option<serde_json::Value>,
        content: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        with_deadline(SIMPLE_DEADLINE, async {
            let page = match pages::Entity::find_by_id(page_id).one(self.db.connection()).await {
                Ok(Some(page)) if page.created_by == user_id => page,
                Ok(Some(_) | None) => return Err(ApiError::not_found("page not found")),
                Err(e) => return Err(ApiError::internal_with("failed to read page", e)),
            };
            let mut active: pages::ActiveModel = page.into();
            active.text_title = sea_orm::Set(text_title);
            active.text_content = sea_orm::Set(text_content);
            active.title = sea_orm::Set(title);
            active.content = sea_orm::Set(content);
            active.updated_at = sea_orm::Set(Utc::now().into());
            active
                .update(self.db.connection())
                .await
                .map_err(|e| ApiError::internal_with("failed to update page", e))?;
            Ok(())
        })
        .await
    }

    /// §4.5. Paged listing of top-level pages, each with its subtree
    /// nested via Tree Assembly (§4.4). Executed in a read-only
    /// transaction so the root page and subtree queries below see one
    /// consistent snapshot (§4.1, §4.6).
    pub async fn list_pages(
        &self,
        user_id: i64,
        size: Option<u32>,
        created_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<PageWithSubPages>, ApiError> {
        with_deadline(SIMPLE_DEADLINE, async {
            let limit = self.config.clamp_page_size(size);
            let txn = self
                .db
                .begin_readonly()
                .await
                .map_err(|e| ApiError::internal_with("failed to start read-only transaction", e))?;
            let conn = &txn;

            let mut query = pages::Entity::find()
                .filter(pages::Column::CreatedBy.eq(user_id))
                .filter(pages::Column::IsTopLevel.eq(true));
            if let Some(before) = created_before {
                query = query.filter(pages::Column::CreatedAt.lt(before));
            }
            let roots = query
                .order_by(pages::Column::CreatedAt, Order::Desc)
                .limit(u64::from(limit))
                .all(conn)
                .await
                .map_err(|e| ApiError::internal_with("failed to list pages", e))?;

            if roots.is_empty() {
                return Ok(Vec::new());
            }

            let root_ids: Vec<Uuid> = roots.iter().map(|p| p.id).collect();
            let closure_rows = pagetree_db::entities::pages_closures::Entity::find()
                .filter(pagetree_db::entities::pages_closures::Column::AncestorId.is_in(root_ids.clone()))
                .all(conn)
                .await
                .map_err(|e| ApiError::internal_with("failed to read subtree ancestry", e))?;

            let descendant_ids: Vec<Uuid> = closure_rows.iter().map(|r| r.descendant_id).collect();
            let descendant_titles = if descendant_ids.is_empty() {
                Vec::new()
            } else {
                pages::Entity::find()
                    .filter(pages::Column::Id.is_in(descendant_ids))
                    .all(conn)
                    .await
                    .map_err(|e| ApiError::internal_with("failed to read subtree titles", e))?
            };

            let mut titles: HashMap<Uuid, Option<String>> = HashMap::new();
            for root in &roots {
                titles.insert(root.id, root.text_title.clone());
            }
            for page in &descendant_titles {
                titles.insert(page.id, page.text_title.clone());
            }

            let rows: Vec<ClosureRow> = closure_rows
                .iter()
                .map(|r| ClosureRow {
                    ancestor_id: r.ancestor_id,
                    descendant_id: r.descendant_id,
                    is_parent: r.is_parent,
                })
                .collect();

            Ok(roots
                .into_iter()
                .map(|root| {
                    let root_id = root.id;
                    let assembled = tree::build_subtree(root_id, &rows, &titles);
                    PageWithSubPages {
                        page: root,
                        sub_pages: assembled.sub_pages,
                    }
                })
                .collect())
        })
        .await
    }
}
