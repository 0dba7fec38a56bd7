//! Vendor profiles and customer feedback.

use breezebuy_server::db::DbService;
use breezebuy_server::db::models::{Comment, UserRegister, VendorCreate};
use breezebuy_server::db::repository::{RepoError, UserRepository, VendorRepository};
use surrealdb::RecordId;

async fn setup() -> (VendorRepository, RecordId, RecordId, String) {
    let db = DbService::memory().await.unwrap();
    let users = UserRepository::new(db.db.clone());

    let owner = users
        .create(UserRegister {
            username: "vera".to_string(),
            email: "vera@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap();
    let customer = users
        .create(UserRegister {
            username: "carl".to_string(),
            email: "carl@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap();

    let vendors = VendorRepository::new(db.db.clone());
    let vendor = vendors
        .create(
            owner.clone(),
            VendorCreate {
                name: "Vera's Veg".to_string(),
                product_label: "Vegetables".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let vendor_id = vendor.id.unwrap().to_string();

    (vendors, owner, customer, vendor_id)
}

#[tokio::test]
async fn one_profile_per_account() {
    let (vendors, owner, _customer, _vendor_id) = setup().await;

    let err = vendors
        .create(
            owner,
            VendorCreate {
                name: "Second Stand".to_string(),
                product_label: "Fruit".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn feedback_recomputes_average_rating() {
    let (vendors, _owner, customer, vendor_id) = setup().await;

    let vendor = vendors
        .add_feedback(&vendor_id, Comment::new(customer.clone(), 4, "good".into()))
        .await
        .unwrap();
    assert_eq!(vendor.average_rating, 4.0);

    let vendor = vendors
        .add_feedback(&vendor_id, Comment::new(customer.clone(), 5, "great".into()))
        .await
        .unwrap();
    assert_eq!(vendor.comments.len(), 2);
    assert_eq!(vendor.average_rating, 4.5);
}

#[tokio::test]
async fn only_the_author_may_edit_and_only_while_unlocked() {
    let (vendors, owner, customer, vendor_id) = setup().await;

    let vendor = vendors
        .add_feedback(&vendor_id, Comment::new(customer.clone(), 3, "fine".into()))
        .await
        .unwrap();
    let comment_id = vendor.comments[0].id.clone();

    // A different account cannot edit
    let err = vendors
        .edit_comment(&vendor_id, &comment_id, &owner, "hacked".into())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    // The author can, and the rank is untouched
    let vendor = vendors
        .edit_comment(&vendor_id, &comment_id, &customer, "actually fine".into())
        .await
        .unwrap();
    assert_eq!(vendor.comments[0].text, "actually fine");
    assert_eq!(vendor.comments[0].rank, 3);
    assert_eq!(vendor.average_rating, 3.0);

    // Locked comments are frozen even for the author
    vendors
        .set_comment_editable(&vendor_id, &comment_id, false)
        .await
        .unwrap();
    let err = vendors
        .edit_comment(&vendor_id, &comment_id, &customer, "one more".into())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));
}

#[tokio::test]
async fn customer_feedback_is_collected_across_vendors() {
    let (vendors, _owner, customer, vendor_id) = setup().await;

    vendors
        .add_feedback(&vendor_id, Comment::new(customer.clone(), 5, "top".into()))
        .await
        .unwrap();

    let feedback = vendors.find_feedback_by_customer(&customer).await.unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].vendor_name, "Vera's Veg");
    assert_eq!(feedback[0].rank, 5);
    assert!(feedback[0].editable);

    // Another customer sees nothing
    let stranger: RecordId = "user:stranger".parse().unwrap();
    assert!(vendors
        .find_feedback_by_customer(&stranger)
        .await
        .unwrap()
        .is_empty());
}
