use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{CartService, NotificationService, OrderWorkflow};
use crate::utils::AppError;

/// Shared server state, one instance behind cheap clones.
///
/// Handlers build per-table repositories from `get_db()`; logic that
/// spans tables goes through the held services.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub notifier: NotificationService,
    pub cart_service: CartService,
    pub order_workflow: OrderWorkflow,
}

impl ServerState {
    /// Open the database and wire up every service
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| AppError::internal(format!("Failed to create data directory: {e}")))?;

        let db = DbService::new(&config.database_dir()).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// Build state around an existing database handle (used by tests
    /// with an in-memory database)
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let notifier = NotificationService::spawn(
            config.notify_webhook_url.clone(),
            config.low_stock_recipient.clone(),
        );
        let cart_service = CartService::new(&db);
        let order_workflow = OrderWorkflow::new(&db, notifier.clone());

        Self {
            config,
            db,
            jwt_service,
            notifier,
            cart_service,
            order_workflow,
        }
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
