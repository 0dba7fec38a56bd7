//! Catalog behavior: visibility, category guards, search.

use breezebuy_server::db::DbService;
use breezebuy_server::db::models::{CategoryCreate, CategoryUpdate, ProductCreate};
use breezebuy_server::db::repository::{CategoryRepository, ProductRepository, RepoError};
use rust_decimal::Decimal;

async fn setup() -> (DbService, CategoryRepository, ProductRepository) {
    let db = DbService::memory().await.unwrap();
    let categories = CategoryRepository::new(db.db.clone());
    let products = ProductRepository::new(db.db.clone());
    (db, categories, products)
}

fn product_payload(name: &str, category: &str) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        description: None,
        price: Decimal::from(10),
        category: category.to_string(),
    }
}

#[tokio::test]
async fn visibility_requires_product_and_category_active() {
    let (_db, categories, products) = setup().await;

    let category = categories
        .create(CategoryCreate {
            name: "Tools".to_string(),
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let product = products
        .create(product_payload("Widget", &cat_id))
        .await
        .unwrap();
    let product_id = product.id.unwrap().to_string();

    assert_eq!(products.find_visible().await.unwrap().len(), 1);
    assert!(products.find_visible_by_id(&product_id).await.unwrap().is_some());

    // Deactivating the category hides the product without touching it
    categories.set_active(&cat_id, false).await.unwrap();
    assert!(products.find_visible().await.unwrap().is_empty());
    assert!(products.find_visible_by_id(&product_id).await.unwrap().is_none());
    // Back office still sees it
    assert!(products.find_by_id(&product_id).await.unwrap().is_some());

    // Reactivate category, deactivate product: still hidden
    categories.set_active(&cat_id, true).await.unwrap();
    products.set_active(&product_id, false).await.unwrap();
    assert!(products.find_visible().await.unwrap().is_empty());

    // Both active again: visible
    products.set_active(&product_id, true).await.unwrap();
    assert_eq!(products.find_visible().await.unwrap().len(), 1);
}

#[tokio::test]
async fn category_product_listing_hides_deactivated_items() {
    let (_db, categories, products) = setup().await;

    let category = categories
        .create(CategoryCreate {
            name: "Camping".to_string(),
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let product = products
        .create(product_payload("Tent", &cat_id))
        .await
        .unwrap();
    let product_id = product.id.unwrap().to_string();

    assert_eq!(products.find_visible_by_category(&cat_id).await.unwrap().len(), 1);

    // Deactivating product and category hides it from the customer listing
    products.set_active(&product_id, false).await.unwrap();
    categories.set_active(&cat_id, false).await.unwrap();
    assert!(products.find_visible_by_category(&cat_id).await.unwrap().is_empty());

    // The back-office listing still has it
    assert_eq!(products.find_by_category(&cat_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn category_delete_blocked_while_products_reference_it() {
    let (_db, categories, products) = setup().await;

    let category = categories
        .create(CategoryCreate {
            name: "Garden".to_string(),
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let product = products
        .create(product_payload("Rake", &cat_id))
        .await
        .unwrap();
    let product_id = product.id.unwrap().to_string();

    let err = categories.delete(&cat_id).await.unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    products.delete(&product_id).await.unwrap();
    assert!(categories.delete(&cat_id).await.unwrap());
    assert!(categories.find_by_id(&cat_id).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_category_name_rejected_case_insensitive() {
    let (_db, categories, _products) = setup().await;

    categories
        .create(CategoryCreate {
            name: "Books".to_string(),
        })
        .await
        .unwrap();

    let err = categories
        .create(CategoryCreate {
            name: "books".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Renaming onto an existing name is refused too
    let other = categories
        .create(CategoryCreate {
            name: "Music".to_string(),
        })
        .await
        .unwrap();
    let err = categories
        .update(
            &other.id.unwrap().to_string(),
            CategoryUpdate {
                name: Some("BOOKS".to_string()),
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn product_create_requires_existing_category() {
    let (_db, _categories, products) = setup().await;

    let err = products
        .create(product_payload("Orphan", "category:doesnotexist"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn search_is_case_insensitive_and_respects_visibility() {
    let (_db, categories, products) = setup().await;

    let category = categories
        .create(CategoryCreate {
            name: "Electronics".to_string(),
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    products
        .create(product_payload("USB Cable", &cat_id))
        .await
        .unwrap();
    let hidden = products
        .create(product_payload("USB Hub", &cat_id))
        .await
        .unwrap();
    products
        .set_active(&hidden.id.unwrap().to_string(), false)
        .await
        .unwrap();

    let all = products.search_by_name("usb", false).await.unwrap();
    assert_eq!(all.len(), 2);

    let visible = products.search_by_name("USB", true).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "USB Cable");

    assert!(products.search_by_name("hdmi", false).await.unwrap().is_empty());
}
