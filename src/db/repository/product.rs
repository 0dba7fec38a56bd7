//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products (back office)
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Customer read path: product and its category must both be active
    pub async fn find_visible(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query(
                "SELECT * FROM product WHERE is_active = true AND category.is_active = true ORDER BY name",
            )
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id (back office)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(id)?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Customer read path by id: a hidden product behaves as missing
    pub async fn find_visible_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM product WHERE id = $thing AND is_active = true AND category.is_active = true LIMIT 1",
            )
            .bind(("thing", thing))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Products of a category
    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<Product>> {
        let cat = parse_record_id(category_id)?;
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE category = $cat ORDER BY name")
            .bind(("cat", cat))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Visible products of a category (own flag and category flag active)
    pub async fn find_visible_by_category(&self, category_id: &str) -> RepoResult<Vec<Product>> {
        let cat = parse_record_id(category_id)?;
        let products: Vec<Product> = self
            .base
            .db()
            .query(
                "SELECT * FROM product WHERE category = $cat AND is_active = true AND category.is_active = true ORDER BY name",
            )
            .bind(("cat", cat))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Case-insensitive substring search on name
    ///
    /// With `active_only`, the match is restricted to visible products
    /// (own flag and category flag both active).
    pub async fn search_by_name(&self, term: &str, active_only: bool) -> RepoResult<Vec<Product>> {
        let term_owned = term.to_lowercase();
        let query = if active_only {
            "SELECT * FROM product WHERE string::lowercase(name) CONTAINS $term AND is_active = true AND category.is_active = true ORDER BY name"
        } else {
            "SELECT * FROM product WHERE string::lowercase(name) CONTAINS $term ORDER BY name"
        };
        let products: Vec<Product> = self
            .base
            .db()
            .query(query)
            .bind(("term", term_owned))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a product; the referenced category must exist
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let cat = parse_record_id(&data.category)?;
        let category: Option<crate::db::models::Category> =
            self.base.db().select(cat.clone()).await?;
        if category.is_none() {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                data.category
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product SET
                    name = $name,
                    description = $description,
                    price = $price,
                    category = $category,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("description", data.description.unwrap_or_default()))
            .bind(("price", data.price))
            .bind(("category", cat))
            .await?;

        let created: Option<Product> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product; a new category link must resolve
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let category = match data.category.as_deref() {
            Some(cat_id) => {
                let cat = parse_record_id(cat_id)?;
                let exists: Option<crate::db::models::Category> =
                    self.base.db().select(cat.clone()).await?;
                if exists.is_none() {
                    return Err(RepoError::NotFound(format!("Category {} not found", cat_id)));
                }
                Some(cat)
            }
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    description = $description OR description,
                    price = IF $has_price THEN $price ELSE price END,
                    category = $category OR category,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("has_price", data.price.is_some()))
            .bind(("price", data.price.unwrap_or(Decimal::ZERO)))
            .bind(("category", category))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .await?;

        result
            .take::<Option<Product>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Flip the activation flag
    pub async fn set_active(&self, id: &str, is_active: bool) -> RepoResult<Product> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET is_active = $is_active RETURN AFTER")
            .bind(("thing", thing))
            .bind(("is_active", is_active))
            .await?;

        result
            .take::<Option<Product>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
