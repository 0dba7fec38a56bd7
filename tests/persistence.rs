//! On-disk database smoke test: data written through a repository
//! survives closing and reopening the RocksDB store.

use breezebuy_server::db::DbService;
use breezebuy_server::db::models::CategoryCreate;
use breezebuy_server::db::repository::CategoryRepository;

#[tokio::test]
async fn categories_survive_a_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("breezebuy.db");

    let created_id = {
        let db = DbService::new(&path).await.expect("open db");
        let categories = CategoryRepository::new(db.db.clone());
        let created = categories
            .create(CategoryCreate {
                name: "Outdoor".to_string(),
            })
            .await
            .expect("create category");
        let id = created.id.expect("id assigned").to_string();
        drop(categories);
        drop(db);
        id
    };

    let db = DbService::new(&path).await.expect("reopen db");
    let categories = CategoryRepository::new(db.db.clone());

    let found = categories
        .find_by_id(&created_id)
        .await
        .expect("query")
        .expect("category persisted");
    assert_eq!(found.name, "Outdoor");
    assert!(found.is_active);
}
