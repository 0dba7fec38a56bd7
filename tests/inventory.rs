//! Inventory ledger: SKU dedup, updates, batch deduction.

use breezebuy_server::db::DbService;
use breezebuy_server::db::models::{
    CategoryCreate, InventoryCreate, InventoryUpdate, ProductCreate,
};
use breezebuy_server::db::repository::{
    CategoryRepository, InventoryRepository, ProductRepository, RepoError,
};
use rust_decimal::Decimal;
use surrealdb::RecordId;

async fn setup() -> (InventoryRepository, Vec<RecordId>) {
    let db = DbService::memory().await.unwrap();

    let categories = CategoryRepository::new(db.db.clone());
    let category = categories
        .create(CategoryCreate {
            name: "Pantry".to_string(),
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let products = ProductRepository::new(db.db.clone());
    let mut product_ids = Vec::new();
    for name in ["Rice", "Beans"] {
        let product = products
            .create(ProductCreate {
                name: name.to_string(),
                description: None,
                price: Decimal::from(2),
                category: cat_id.clone(),
            })
            .await
            .unwrap();
        product_ids.push(product.id.unwrap());
    }

    (InventoryRepository::new(db.db.clone()), product_ids)
}

#[tokio::test]
async fn sku_is_the_dedup_key() {
    let (inventory, products) = setup().await;

    inventory
        .create(InventoryCreate {
            product: products[0].to_string(),
            sku: "PAN-001".to_string(),
            quantity_available: 20,
            reorder_level: 5,
        })
        .await
        .unwrap();

    // Same SKU, even against a different product, is refused
    let err = inventory
        .create(InventoryCreate {
            product: products[1].to_string(),
            sku: "PAN-001".to_string(),
            quantity_available: 10,
            reorder_level: 2,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn create_snapshots_the_product_name() {
    let (inventory, products) = setup().await;

    let record = inventory
        .create(InventoryCreate {
            product: products[0].to_string(),
            sku: "PAN-002".to_string(),
            quantity_available: 7,
            reorder_level: 3,
        })
        .await
        .unwrap();
    assert_eq!(record.product_name, "Rice");
    assert!(record.last_updated > 0);
}

#[tokio::test]
async fn tracking_an_unknown_product_fails() {
    let (inventory, _products) = setup().await;

    let err = inventory
        .create(InventoryCreate {
            product: "product:ghost".to_string(),
            sku: "PAN-404".to_string(),
            quantity_available: 1,
            reorder_level: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn update_replaces_counts_and_restamps() {
    let (inventory, products) = setup().await;

    let record = inventory
        .create(InventoryCreate {
            product: products[0].to_string(),
            sku: "PAN-003".to_string(),
            quantity_available: 10,
            reorder_level: 5,
        })
        .await
        .unwrap();
    let id = record.id.unwrap().to_string();

    let record = inventory
        .update(
            &id,
            InventoryUpdate {
                quantity_available: 2,
                reorder_level: 5,
            },
        )
        .await
        .unwrap();
    assert_eq!(record.quantity_available, 2);
    assert!(record.is_low_stock());
}

#[tokio::test]
async fn batch_deduction_fails_whole_when_one_line_is_short() {
    let (inventory, products) = setup().await;

    inventory
        .create(InventoryCreate {
            product: products[0].to_string(),
            sku: "PAN-010".to_string(),
            quantity_available: 10,
            reorder_level: 2,
        })
        .await
        .unwrap();
    inventory
        .create(InventoryCreate {
            product: products[1].to_string(),
            sku: "PAN-011".to_string(),
            quantity_available: 1,
            reorder_level: 2,
        })
        .await
        .unwrap();

    // Second line is short: nothing is written
    let err = inventory
        .deduct_for_items(&[(products[0].clone(), 5), (products[1].clone(), 3)])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    let a = inventory.find_by_sku("PAN-010").await.unwrap().unwrap();
    let b = inventory.find_by_sku("PAN-011").await.unwrap().unwrap();
    assert_eq!(a.quantity_available, 10);
    assert_eq!(b.quantity_available, 1);

    // A covered batch lands on both
    let updated = inventory
        .deduct_for_items(&[(products[0].clone(), 5), (products[1].clone(), 1)])
        .await
        .unwrap();
    assert_eq!(updated.len(), 2);
    assert_eq!(updated[0].quantity_available, 5);
    assert_eq!(updated[1].quantity_available, 0);
}
