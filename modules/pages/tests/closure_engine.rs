//! Black-box scenarios for the closure-table engine, driven through
//! `PagesService` against an in-memory SQLite database, covering the
//! lettered scenarios from spec §8.

use pages::{PagesService, ServiceConfig};
use pagetree_db::{Db, PoolConfig};
use pagetree_errors::ApiError;

const OWNER: i64 = 1;
const OTHER_OWNER: i64 = 2;

async fn test_service() -> PagesService {
    let db = Db::connect("sqlite::memory:", &PoolConfig::default())
        .await
        .expect("in-memory database connects and migrates");
    PagesService::new(db, ServiceConfig::default())
}

/// S1: creating a top-level page, then a child of it, both belong to the
/// same owner and the child nests under the parent in the listing.
#[tokio::test]
async fn creates_top_level_page_and_nested_child() {
    let service = test_service().await;

    let root_id = service.create_page(OWNER, None).await.expect("create root");
    let child_id = service
        .create_page(OWNER, Some(root_id))
        .await
        .expect("create child");

    let roots = service
        .list_pages(OWNER, None, None)
        .await
        .expect("list pages");
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].page.id, root_id);
    assert_eq!(roots[0].sub_pages.len(), 1);
    assert_eq!(roots[0].sub_pages[0].page.id, child_id);
}

/// S2: creating a child under a page owned by someone else is a 404, not
/// a 403 — existence is not leaked across owners.
#[tokio::test]
async fn create_under_foreign_page_is_not_found() {
    let service = test_service().await;
    let root_id = service
        .create_page(OTHER_OWNER, None)
        .await
        .expect("create root for another owner");

    let result = service.create_page(OWNER, Some(root_id)).await;
    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

/// S3: deleting a page with nested descendants removes the whole subtree,
/// and a later lookup of either the page or its former child is 404.
#[tokio::test]
async fn delete_removes_nested_subtree() {
    let service = test_service().await;
    let root_id = service.create_page(OWNER, None).await.expect("create root");
    let child_id = service
        .create_page(OWNER, Some(root_id))
        .await
        .expect("create child");
    let grandchild_id = service
        .create_page(OWNER, Some(child_id))
        .await
        .expect("create grandchild");

    service
        .delete_page(OWNER, child_id)
        .await
        .expect("delete child and its descendants");

    assert!(matches!(
        service.get_page(OWNER, child_id).await,
        Err(ApiError::NotFound { .. })
    ));
    assert!(matches!(
        service.get_page(OWNER, grandchild_id).await,
        Err(ApiError::NotFound { .. })
    ));
    let root = service.get_page(OWNER, root_id).await.expect("root survives");
    assert_eq!(root.id, root_id);
}

/// S4: reordering a page under a new parent updates its ancestry, and
/// reparenting a page under its own descendant is rejected as a cycle.
#[tokio::test]
async fn reorder_updates_ancestry_and_rejects_cycles() {
    let service = test_service().await;
    let root_a = service.create_page(OWNER, None).await.expect("create root a");
    let root_b = service.create_page(OWNER, None).await.expect("create root b");
    let child = service
        .create_page(OWNER, Some(root_a))
        .await
        .expect("create child under a");

    service
        .reorder_page(OWNER, child, root_b)
        .await
        .expect("reparent child under root b");

    let roots = service.list_pages(OWNER, None, None).await.expect("list pages");
    let under_b = roots.iter().find(|p| p.page.id == root_b).expect("root b present");
    assert_eq!(under_b.sub_pages.len(), 1);
    assert_eq!(under_b.sub_pages[0].page.id, child);

    let cyclic = service.reorder_page(OWNER, root_b, child).await;
    assert!(matches!(cyclic, Err(ApiError::BadRequest { .. })));
}

/// S5: duplicating a subtree produces a fresh, isomorphic copy with new
/// ids, leaving the original intact.
#[tokio::test]
async fn duplicate_copies_subtree_with_new_ids() {
    let service = test_service().await;
    let root_id = service.create_page(OWNER, None).await.expect("create root");
    let child_id = service
        .create_page(OWNER, Some(root_id))
        .await
        .expect("create child");

    let copy_id = service
        .duplicate_page(OWNER, root_id)
        .await
        .expect("duplicate subtree");
    assert_ne!(copy_id, root_id);

    let roots = service.list_pages(OWNER, None, None).await.expect("list pages");
    assert_eq!(roots.len(), 2);
    let copy = roots.iter().find(|p| p.page.id == copy_id).expect("copy present");
    assert_eq!(copy.sub_pages.len(), 1);
    assert_ne!(copy.sub_pages[0].page.id, child_id);

    let original = roots.iter().find(|p| p.page.id == root_id).expect("original present");
    assert_eq!(original.sub_pages.len(), 1);
    assert_eq!(original.sub_pages[0].page.id, child_id);
}

/// Property 4 (§8): duplicating a page that is itself nested under another
/// page must make that external ancestor an ancestor of the duplicate's
/// whole subtree too, not just of the duplicate's root.
#[tokio::test]
async fn duplicate_of_nested_page_stays_visible_to_external_ancestor() {
    let service = test_service().await;
    let root_id = service.create_page(OWNER, None).await.expect("create root");
    let child_id = service
        .create_page(OWNER, Some(root_id))
        .await
        .expect("create child under root");
    let grandchild_id = service
        .create_page(OWNER, Some(child_id))
        .await
        .expect("create grandchild under child");

    let copy_id = service
        .duplicate_page(OWNER, child_id)
        .await
        .expect("duplicate nested child");
    assert_ne!(copy_id, child_id);

    let roots = service.list_pages(OWNER, None, None).await.expect("list pages");
    assert_eq!(roots.len(), 1, "the duplicate is nested, not a new top-level page");
    let root = &roots[0];
    assert_eq!(root.page.id, root_id);
    assert_eq!(
        root.sub_pages.len(),
        2,
        "root must see both the original child and the duplicate as direct children"
    );

    let duplicate = root
        .sub_pages
        .iter()
        .find(|p| p.id == copy_id)
        .expect("duplicated child is visible under the external ancestor");
    assert_eq!(duplicate.sub_pages.len(), 1);
    assert_ne!(duplicate.sub_pages[0].id, grandchild_id);

    let original = root
        .sub_pages
        .iter()
        .find(|p| p.id == child_id)
        .expect("original child untouched");
    assert_eq!(original.sub_pages.len(), 1);
    assert_eq!(original.sub_pages[0].id, grandchild_id);
}

/// S6: operating on a page id that does not exist at all is 404, the same
/// as operating on one owned by someone else.
#[tokio::test]
async fn operations_on_missing_page_are_not_found() {
    let service = test_service().await;
    let missing = uuid::Uuid::new_v4();

    assert!(matches!(
        service.get_page(OWNER, missing).await,
        Err(ApiError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_page(OWNER, missing).await,
        Err(ApiError::NotFound { .. })
    ));
    assert!(matches!(
        service.duplicate_page(OWNER, missing).await,
        Err(ApiError::NotFound { .. })
    ));
}

#[tokio::test]
async fn update_page_persists_content_and_rejects_foreign_owner() {
    let service = test_service().await;
    let root_id = service.create_page(OWNER, None).await.expect("create root");

    service
        .update_page(
            OWNER,
            root_id,
            Some("Title".to_owned()),
            Some("Body".to_owned()),
            None,
            None,
        )
        .await
        .expect("update own page");

    let page = service.get_page(OWNER, root_id).await.expect("read back");
    assert_eq!(page.text_title.as_deref(), Some("Title"));
    assert_eq!(page.text_content.as_deref(), Some("Body"));

    let result = service
        .update_page(OTHER_OWNER, root_id, None, None, None, None)
        .await;
    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}
