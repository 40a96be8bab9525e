//! The closure engine (§4.3): Create, Delete, Reorder, Duplicate.
//!
//! Every function here runs against a single open connection/transaction
//! handed to it by the caller (`modules/pages/src/domain/service.rs` owns
//! the transaction's lifetime); none of them commit or roll back.

use chrono::Utc;
use pagetree_db::entities::{pages, pages_closures};
use pagetree_errors::ApiError;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::ordering::{Spacing, next_position};

/// The columns Duplicate copies from a source page to its copy: every
/// `pages` column except `id`, `position`, `created_at`, `updated_at`.
/// Kept as a literal list so a reviewer can compare it against the
/// schema at a glance; `pagetree_db::entities::pages::DUPLICABLE_COLUMN_COUNT`
/// is asserted against the live entity so drift fails a unit test rather
/// than surfacing at runtime (§4.3.4, §8 property 8).
pub const DUPLICATED_PAGE_COLUMNS: [&str; 6] = [
    "created_by",
    "is_top_level",
    "text_title",
    "text_content",
    "title",
    "content",
];

async fn fetch_owned<C: ConnectionTrait>(
    conn: &C,
    owner: i64,
    page_id: Uuid,
    action: &str,
) -> Result<pages::Model, ApiError> {
    match pages::Entity::find_by_id(page_id).one(conn).await {
        Ok(Some(page)) if page.created_by == owner => Ok(page),
        Ok(Some(_) | None) => Err(ApiError::not_found(format!("{action}: page not found"))),
        Err(e) => Err(ApiError::internal_with(format!("{action}: failed to look up page"), e)),
    }
}

/// §4.3.1 Create.
pub async fn create_page<C: ConnectionTrait>(
    conn: &C,
    owner: i64,
    parent_id: Option<Uuid>,
    spacing: Spacing,
) -> Result<Uuid, ApiError> {
    let position = next_position(conn, owner, spacing)
        .await
        .map_err(|e| ApiError::internal_with("failed to allocate position", e))?;
    let new_id = Uuid::new_v4();
    let now = Utc::now();

    let ancestor_edges: Vec<(Uuid, bool)> = if let Some(parent_id) = parent_id {
        fetch_owned(conn, owner, parent_id, "create page").await?;
        pages_closures::Entity::find()
            .filter(pages_closures::Column::DescendantId.eq(parent_id))
            .all(conn)
            .await
            .map_err(|e| ApiError::internal_with("failed to read parent ancestry", e))?
            .into_iter()
            .map(|row| (row.ancestor_id, false))
            .chain(std::iter::once((parent_id, true)))
            .collect()
    } else {
        Vec::new()
    };

    let page = pages::ActiveModel {
        id: Set(new_id),
        created_by: Set(owner),
        position: Set(position),
        is_top_level: Set(parent_id.is_none()),
        text_title: Set(None),
        text_content: Set(None),
        title: Set(None),
        content: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    page.insert(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to create page", e))?;

    if !ancestor_edges.is_empty() {
        let models = ancestor_edges.into_iter().map(|(ancestor_id, is_parent)| {
            pages_closures::ActiveModel {
                ancestor_id: Set(ancestor_id),
                descendant_id: Set(new_id),
                is_parent: Set(is_parent),
            }
        });
        pages_closures::Entity::insert_many(models)
            .exec(conn)
            .await
            .map_err(|e| ApiError::internal_with("failed to link new page", e))?;
    }

    Ok(new_id)
}

/// §4.3.2 Delete.
pub async fn delete_page<C: ConnectionTrait>(conn: &C, owner: i64, page_id: Uuid) -> Result<(), ApiError> {
    let descendant_ids: Vec<Uuid> = pages_closures::Entity::find()
        .filter(pages_closures::Column::AncestorId.eq(page_id))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to enumerate subtree", e))?
        .into_iter()
        .map(|row| row.descendant_id)
        .collect();

    if !descendant_ids.is_empty() {
        pages::Entity::delete_many()
            .filter(pages::Column::Id.is_in(descendant_ids))
            .exec(conn)
            .await
            .map_err(|e| ApiError::internal_with("failed to delete descendants", e))?;
    }

    let result = pages::Entity::delete_many()
        .filter(
            Condition::all()
                .add(pages::Column::Id.eq(page_id))
                .add(pages::Column::CreatedBy.eq(owner)),
        )
        .exec(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to delete page", e))?;

    if result.rows_affected == 0 {
        return Err(ApiError::not_found("page not found"));
    }
    Ok(())
}

/// §4.3.3 Reorder (reparent).
pub async fn reorder_page<C: ConnectionTrait>(
    conn: &C,
    owner: i64,
    page_id: Uuid,
    new_parent_id: Uuid,
) -> Result<(), ApiError> {
    let page = fetch_owned(conn, owner, page_id, "reorder page").await?;
    fetch_owned(conn, owner, new_parent_id, "reorder page").await?;

    let nested = pages_closures::Entity::find()
        .filter(pages_closures::Column::AncestorId.eq(page_id))
        .filter(pages_closures::Column::DescendantId.eq(new_parent_id))
        .one(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to check nesting", e))?
        .is_some();
    if nested {
        return Err(ApiError::bad_request("cannot add page to nested page"));
    }

    let ancestors_of_page: Vec<Uuid> = pages_closures::Entity::find()
        .filter(pages_closures::Column::DescendantId.eq(page_id))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to read ancestry", e))?
        .into_iter()
        .map(|row| row.ancestor_id)
        .collect();

    let ancestors_of_new_parent: Vec<Uuid> = pages_closures::Entity::find()
        .filter(pages_closures::Column::DescendantId.eq(new_parent_id))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to read new parent ancestry", e))?
        .into_iter()
        .map(|row| row.ancestor_id)
        .collect();

    let mut subtree: Vec<Uuid> = pages_closures::Entity::find()
        .filter(pages_closures::Column::AncestorId.eq(page_id))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to enumerate subtree", e))?
        .into_iter()
        .map(|row| row.descendant_id)
        .collect();
    subtree.push(page_id);

    if !ancestors_of_page.is_empty() {
        pages_closures::Entity::delete_many()
            .filter(
                Condition::all()
                    .add(pages_closures::Column::DescendantId.is_in(subtree.clone()))
                    .add(pages_closures::Column::AncestorId.is_in(ancestors_of_page)),
            )
            .exec(conn)
            .await
            .map_err(|e| ApiError::internal_with("failed to unlink old ancestry", e))?;
    }

    if !ancestors_of_new_parent.is_empty() {
        let models = subtree.iter().flat_map(|s| {
            ancestors_of_new_parent.iter().map(move |a| pages_closures::ActiveModel {
                ancestor_id: Set(*a),
                descendant_id: Set(*s),
                is_parent: Set(false),
            })
        });
        pages_closures::Entity::insert_many(models)
            .exec(conn)
            .await
            .map_err(|e| ApiError::internal_with("failed to link new ancestry", e))?;
    }

    pages_closures::ActiveModel {
        ancestor_id: Set(new_parent_id),
        descendant_id: Set(page_id),
        is_parent: Set(true),
    }
    .insert(conn)
    .await
    .map_err(|e| ApiError::internal_with("failed to link new parent", e))?;

    let mut active = pages::ActiveModel::from(page);
    active.is_top_level = Set(false);
    active.updated_at = Set(Utc::now().into());
    active
        .update(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to update page", e))?;

    Ok(())
}

/// §4.3.4 step 2: inserts the copy of the source root itself.
async fn insert_duplicate_root<C: ConnectionTrait>(
    conn: &C,
    owner: i64,
    root: &pages::Model,
    new_root_id: Uuid,
    position: f64,
    now: chrono::DateTime<Utc>,
) -> Result<(), ApiError> {
    let new_root_title = root
        .text_title
        .as_deref()
        .map_or_else(|| "Copy".to_owned(), |title| format!("Copy of - {title}"));
    pages::ActiveModel {
        id: Set(new_root_id),
        created_by: Set(owner),
        position: Set(position),
        is_top_level: Set(root.is_top_level),
        text_title: Set(Some(new_root_title)),
        text_content: Set(root.text_content.clone()),
        title: Set(root.title.clone()),
        content: Set(root.content.clone()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(conn)
    .await
    .map_err(|e| ApiError::internal_with("failed to duplicate page", e))?;
    Ok(())
}

/// §4.3.4 step 3: the copy's own ancestor edges, copied verbatim from the
/// source root's ancestry with the descendant remapped to the copy.
async fn root_ancestor_edges<C: ConnectionTrait>(
    conn: &C,
    page_id: Uuid,
    new_root_id: Uuid,
) -> Result<Vec<pages_closures::ActiveModel>, ApiError> {
    let edges = pages_closures::Entity::find()
        .filter(pages_closures::Column::DescendantId.eq(page_id))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to read ancestry", e))?
        .into_iter()
        .map(|row| pages_closures::ActiveModel {
            ancestor_id: Set(row.ancestor_id),
            descendant_id: Set(new_root_id),
            is_parent: Set(row.is_parent),
        })
        .collect();
    Ok(edges)
}

/// §4.3.4 steps 4-5: bulk-inserts a fresh `pages` row for every descendant
/// of `page_id`, each at a monotonically increasing position, and returns
/// the old-id -> new-id mapping (including the root itself).
async fn duplicate_descendants<C: ConnectionTrait>(
    conn: &C,
    owner: i64,
    page_id: Uuid,
    new_root_id: Uuid,
    mut next_pos: f64,
    spacing: Spacing,
    now: chrono::DateTime<Utc>,
) -> Result<(std::collections::HashMap<Uuid, Uuid>, Vec<Uuid>), ApiError> {
    let descendant_ids: Vec<Uuid> = pages_closures::Entity::find()
        .filter(pages_closures::Column::AncestorId.eq(page_id))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to enumerate subtree", e))?
        .into_iter()
        .map(|row| row.descendant_id)
        .collect();

    let mut id_map = std::collections::HashMap::with_capacity(descendant_ids.len() + 1);
    id_map.insert(page_id, new_root_id);
    if descendant_ids.is_empty() {
        return Ok((id_map, descendant_ids));
    }
    for old_id in &descendant_ids {
        id_map.insert(*old_id, Uuid::new_v4());
    }

    let source_rows = pages::Entity::find()
        .filter(pages::Column::Id.is_in(descendant_ids.clone()))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to read subtree pages", e))?;

    let mut new_pages = Vec::with_capacity(source_rows.len());
    for source in source_rows {
        let new_id = *id_map
            .get(&source.id)
            .ok_or_else(|| ApiError::internal("missing id mapping for duplicated descendant"))?;
        new_pages.push(pages::ActiveModel {
            id: Set(new_id),
            created_by: Set(owner),
            position: Set(next_pos),
            is_top_level: Set(source.is_top_level),
            text_title: Set(source.text_title),
            text_content: Set(source.text_content),
            title: Set(source.title),
            content: Set(source.content),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        });
        next_pos += spacing;
    }
    pages::Entity::insert_many(new_pages)
        .exec(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to insert duplicated subtree", e))?;

    Ok((id_map, descendant_ids))
}

/// §4.3.4 step 6: remaps every ancestor edge touching a duplicated
/// descendant (the root's own ancestor edges are handled separately by
/// [`root_ancestor_edges`], so `descendant_ids` must exclude it). An
/// ancestor that was itself duplicated (the root or another descendant)
/// is rewritten through `id_map`; an external ancestor above the source
/// root is carried over unchanged so it also sees the duplicated subtree.
async fn remap_descendant_edges<C: ConnectionTrait>(
    conn: &C,
    descendant_ids: Vec<Uuid>,
    id_map: &std::collections::HashMap<Uuid, Uuid>,
) -> Result<Vec<pages_closures::ActiveModel>, ApiError> {
    let rows = pages_closures::Entity::find()
        .filter(pages_closures::Column::DescendantId.is_in(descendant_ids))
        .all(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to read subtree ancestry", e))?;

    let mut edges = Vec::with_capacity(rows.len());
    for row in rows {
        let new_descendant = *id_map
            .get(&row.descendant_id)
            .ok_or_else(|| ApiError::internal("missing id mapping for duplicated edge"))?;
        let new_ancestor = id_map.get(&row.ancestor_id).copied().unwrap_or(row.ancestor_id);
        edges.push(pages_closures::ActiveModel {
            ancestor_id: Set(new_ancestor),
            descendant_id: Set(new_descendant),
            is_parent: Set(row.is_parent),
        });
    }
    Ok(edges)
}

/// §4.3.4 Duplicate (deep copy).
pub async fn duplicate_page<C: ConnectionTrait>(
    conn: &C,
    owner: i64,
    page_id: Uuid,
    spacing: Spacing,
) -> Result<Uuid, ApiError> {
    let root = fetch_owned(conn, owner, page_id, "duplicate page").await?;
    let next_pos = next_position(conn, owner, spacing)
        .await
        .map_err(|e| ApiError::internal_with("failed to allocate position", e))?;
    let new_root_id = Uuid::new_v4();
    let now = Utc::now();

    insert_duplicate_root(conn, owner, &root, new_root_id, next_pos, now).await?;
    let mut new_edges = root_ancestor_edges(conn, page_id, new_root_id).await?;

    let (id_map, descendant_ids) =
        duplicate_descendants(conn, owner, page_id, new_root_id, next_pos + spacing, spacing, now).await?;
    if !descendant_ids.is_empty() {
        new_edges.extend(remap_descendant_edges(conn, descendant_ids, &id_map).await?);
    }

    pages_closures::Entity::insert_many(new_edges)
        .exec(conn)
        .await
        .map_err(|e| ApiError::internal_with("failed to link duplicated subtree", e))?;

    Ok(new_root_id)
}

#[cfg(test)]
mod tests {
    use super::DUPLICATED_PAGE_COLUMNS;
    use pagetree_db::entities::pages::DUPLICABLE_COLUMN_COUNT;

    /// §8 property 8: the literal column list Duplicate copies must track
    /// the live `pages` schema minus `id`/`position`/`created_at`/`updated_at`.
    #[test]
    fn duplicated_column_list_matches_schema_count() {
        assert_eq!(DUPLICATED_PAGE_COLUMNS.len(), DUPLICABLE_COLUMN_COUNT);
    }
}
