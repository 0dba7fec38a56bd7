//! Checkout, order lifecycle and stock deduction.

use breezebuy_server::db::DbService;
use breezebuy_server::db::models::{
    CartItemAdd, CategoryCreate, InventoryCreate, OrderItemSubmit, OrderStatus, OrderSubmit,
    ProductCreate, UserRegister,
};
use breezebuy_server::db::repository::{
    CategoryRepository, InventoryRepository, OrderRepository, ProductRepository, RepoError,
    UserRepository,
};
use breezebuy_server::services::{CartService, NotificationService, OrderWorkflow};
use rust_decimal::Decimal;
use surrealdb::RecordId;

struct Fixture {
    customer: RecordId,
    product_id: String,
    inventory: InventoryRepository,
    orders: OrderRepository,
    carts: CartService,
    workflow: OrderWorkflow,
}

/// One customer, one product at $3 with 10 units in stock (reorder at 5)
async fn setup() -> Fixture {
    let db = DbService::memory().await.unwrap();

    let users = UserRepository::new(db.db.clone());
    let user = users
        .create(UserRegister {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "correct-horse".to_string(),
        })
        .await
        .unwrap();
    let customer = user.id.unwrap();

    let categories = CategoryRepository::new(db.db.clone());
    let category = categories
        .create(CategoryCreate {
            name: "Snacks".to_string(),
        })
        .await
        .unwrap();

    let products = ProductRepository::new(db.db.clone());
    let product = products
        .create(ProductCreate {
            name: "Granola Bar".to_string(),
            description: None,
            price: Decimal::from(3),
            category: category.id.unwrap().to_string(),
        })
        .await
        .unwrap();
    let product_id = product.id.unwrap().to_string();

    let inventory = InventoryRepository::new(db.db.clone());
    inventory
        .create(InventoryCreate {
            product: product_id.clone(),
            sku: "SNK-001".to_string(),
            quantity_available: 10,
            reorder_level: 5,
        })
        .await
        .unwrap();

    let notifier = NotificationService::spawn(None, "inventory@test".to_string());
    let carts = CartService::new(&db);
    let workflow = OrderWorkflow::new(&db, notifier);
    let orders = OrderRepository::new(db.db.clone());

    Fixture {
        customer,
        product_id,
        inventory,
        orders,
        carts,
        workflow,
    }
}

#[tokio::test]
async fn checkout_prices_from_cart_and_deducts_stock() {
    let f = setup().await;

    f.carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 2,
            }],
        )
        .await
        .unwrap();

    let order = f.workflow.place_order_from_cart(&f.customer).await.unwrap();
    assert_eq!(order.status, OrderStatus::Purchased);
    assert!(order.inventory_applied);
    assert_eq!(order.total_payment, Decimal::from(6));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);

    // Cart is emptied on success
    let cart = f.carts.get_cart(&f.customer).await.unwrap();
    assert!(cart.items.is_empty());

    // Ledger went from 10 to 8
    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    assert_eq!(record.quantity_available, 8);
    assert!(!record.is_low_stock());
}

#[tokio::test]
async fn deduction_applies_exactly_once() {
    let f = setup().await;

    f.carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 1,
            }],
        )
        .await
        .unwrap();
    let order = f.workflow.place_order_from_cart(&f.customer).await.unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    // Re-applying against the stamped order is an error, not a second deduction
    let fresh = f.orders.find_by_id(&order_id).await.unwrap().unwrap();
    let err = f.workflow.apply_deduction(&fresh).await.unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    assert_eq!(record.quantity_available, 9);
}

#[tokio::test]
async fn dropping_below_reorder_level_flags_low_stock() {
    let f = setup().await;

    f.carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 6,
            }],
        )
        .await
        .unwrap();
    f.workflow.place_order_from_cart(&f.customer).await.unwrap();

    // 10 - 6 = 4, strictly below the reorder level of 5
    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    assert_eq!(record.quantity_available, 4);
    assert!(record.is_low_stock());
    assert_eq!(f.inventory.find_low_stock().await.unwrap().len(), 1);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_checkout() {
    let f = setup().await;

    // Cart contents pass the add-time check, then stock shrinks underneath
    f.carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 8,
            }],
        )
        .await
        .unwrap();
    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    f.inventory
        .update(
            &record.id.unwrap().to_string(),
            breezebuy_server::db::models::InventoryUpdate {
                quantity_available: 3,
                reorder_level: 5,
            },
        )
        .await
        .unwrap();

    let err = f.workflow.place_order_from_cart(&f.customer).await.unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    // No half-placed order, cart intact, stock untouched
    assert!(f.orders.find_all().await.unwrap().is_empty());
    let cart = f.carts.get_cart(&f.customer).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    assert_eq!(record.quantity_available, 3);
}

#[tokio::test]
async fn cart_lines_merge_by_product() {
    let f = setup().await;

    f.carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 2,
            }],
        )
        .await
        .unwrap();
    let cart = f
        .carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 3,
            }],
        )
        .await
        .unwrap();

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.total_amount(), Decimal::from(15));
}

#[tokio::test]
async fn cart_add_checks_stock_including_existing_lines() {
    let f = setup().await;

    f.carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 7,
            }],
        )
        .await
        .unwrap();

    // 7 in cart + 4 requested > 10 available
    let err = f
        .carts
        .add_items(
            &f.customer,
            vec![CartItemAdd {
                product: f.product_id.clone(),
                quantity: 4,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));
}

#[tokio::test]
async fn submitted_orders_are_priced_server_side() {
    let f = setup().await;

    let order = f
        .workflow
        .submit_order(
            &f.customer,
            OrderSubmit {
                vendor: None,
                items: vec![OrderItemSubmit {
                    product: f.product_id.clone(),
                    quantity: 4,
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.inventory_applied);
    assert_eq!(order.items[0].price, Decimal::from(3));
    assert_eq!(order.total_payment, Decimal::from(12));

    // Pending orders have not touched the ledger
    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    assert_eq!(record.quantity_available, 10);
}

#[tokio::test]
async fn lifecycle_moves_forward_only() {
    let f = setup().await;

    let order = f
        .workflow
        .submit_order(
            &f.customer,
            OrderSubmit {
                vendor: None,
                items: vec![OrderItemSubmit {
                    product: f.product_id.clone(),
                    quantity: 2,
                }],
            },
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    // Pending cannot jump straight to delivered
    let err = f
        .workflow
        .transition(&order_id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    let order = f
        .workflow
        .transition(&order_id, OrderStatus::Purchased)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Purchased);
    assert!(order.inventory_applied);
    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    assert_eq!(record.quantity_available, 8);

    let order = f
        .workflow
        .transition(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);

    // No going back
    let err = f
        .workflow
        .transition(&order_id, OrderStatus::Purchased)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));
}

#[tokio::test]
async fn reconcile_finishes_interrupted_purchases() {
    let f = setup().await;

    // Simulate a crash after the status write but before deduction:
    // a purchased order with no inventory_applied stamp
    let order = f
        .workflow
        .submit_order(
            &f.customer,
            OrderSubmit {
                vendor: None,
                items: vec![OrderItemSubmit {
                    product: f.product_id.clone(),
                    quantity: 2,
                }],
            },
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();
    f.orders
        .set_status(&order_id, OrderStatus::Purchased)
        .await
        .unwrap();

    let applied = f.workflow.reconcile().await.unwrap();
    assert_eq!(applied, 1);

    let order = f.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(order.inventory_applied);
    let record = f.inventory.find_by_sku("SNK-001").await.unwrap().unwrap();
    assert_eq!(record.quantity_available, 8);

    // A second pass finds nothing to do
    assert_eq!(f.workflow.reconcile().await.unwrap(), 0);
}
