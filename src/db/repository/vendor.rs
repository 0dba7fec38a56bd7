//! Vendor Repository
//!
//! Feedback comments are embedded in the vendor document; the average
//! rating is recomputed from the full comment list on every change.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    Comment, CustomerFeedback, Vendor, VendorCreate, VendorUpdate,
};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all vendors ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Vendor>> {
        let vendors: Vec<Vendor> = self
            .base
            .db()
            .query("SELECT * FROM vendor ORDER BY name")
            .await?
            .take(0)?;
        Ok(vendors)
    }

    /// Find vendor by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Vendor>> {
        let thing = parse_record_id(id)?;
        let vendor: Option<Vendor> = self.base.db().select(thing).await?;
        Ok(vendor)
    }

    /// Find the vendor profile owned by a user account
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<Vendor>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM vendor WHERE user = $user LIMIT 1")
            .bind(("user", user.clone()))
            .await?;
        let vendors: Vec<Vendor> = result.take(0)?;
        Ok(vendors.into_iter().next())
    }

    /// Create a vendor profile; one per user account
    pub async fn create(&self, user: RecordId, data: VendorCreate) -> RepoResult<Vendor> {
        if self.find_by_user(&user).await?.is_some() {
            return Err(RepoError::Duplicate(
                "Vendor profile already exists for this account".to_string(),
            ));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE vendor SET
                    user = $user,
                    name = $name,
                    product_label = $product_label,
                    description = $description,
                    average_rating = 0.0,
                    comments = []
                RETURN AFTER"#,
            )
            .bind(("user", user))
            .bind(("name", data.name))
            .bind(("product_label", data.product_label))
            .bind(("description", data.description.unwrap_or_default()))
            .await?;

        let created: Option<Vendor> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create vendor".to_string()))
    }

    /// Update profile fields
    pub async fn update(&self, id: &str, data: VendorUpdate) -> RepoResult<Vendor> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    product_label = $product_label OR product_label,
                    description = $description OR description
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("product_label", data.product_label))
            .bind(("description", data.description))
            .await?;

        result
            .take::<Option<Vendor>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))
    }

    /// Append a feedback comment and recompute the average rating
    pub async fn add_feedback(&self, id: &str, comment: Comment) -> RepoResult<Vendor> {
        let vendor = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))?;

        let mut comments = vendor.comments;
        comments.push(comment);
        let average = Vendor::mean_rating(&comments);

        self.save_comments(id, comments, average).await
    }

    /// Rewrite a comment's text. Only the original author may edit,
    /// and only while the comment is still marked editable.
    pub async fn edit_comment(
        &self,
        id: &str,
        comment_id: &str,
        author: &RecordId,
        text: String,
    ) -> RepoResult<Vendor> {
        let vendor = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))?;

        let mut comments = vendor.comments;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| RepoError::NotFound(format!("Comment {} not found", comment_id)))?;

        if &comment.customer != author {
            return Err(RepoError::BusinessRule(
                "Only the comment author may edit it".to_string(),
            ));
        }
        if !comment.editable {
            return Err(RepoError::BusinessRule(
                "Comment is no longer editable".to_string(),
            ));
        }
        comment.text = text;

        let average = Vendor::mean_rating(&comments);
        self.save_comments(id, comments, average).await
    }

    /// Lock or unlock a comment for editing (rank never changes either way)
    pub async fn set_comment_editable(
        &self,
        id: &str,
        comment_id: &str,
        editable: bool,
    ) -> RepoResult<Vendor> {
        let vendor = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))?;

        let mut comments = vendor.comments;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| RepoError::NotFound(format!("Comment {} not found", comment_id)))?;
        comment.editable = editable;

        let average = Vendor::mean_rating(&comments);
        self.save_comments(id, comments, average).await
    }

    /// Flat view of everything a customer has written, across all vendors
    pub async fn find_feedback_by_customer(
        &self,
        customer: &RecordId,
    ) -> RepoResult<Vec<CustomerFeedback>> {
        let vendors = self.find_all().await?;
        let mut feedback = Vec::new();
        for vendor in vendors {
            let vendor_id = match &vendor.id {
                Some(id) => id.to_string(),
                None => continue,
            };
            for comment in &vendor.comments {
                if &comment.customer == customer {
                    feedback.push(CustomerFeedback {
                        vendor_id: vendor_id.clone(),
                        vendor_name: vendor.name.clone(),
                        vendor_product: vendor.product_label.clone(),
                        comment_id: comment.id.clone(),
                        text: comment.text.clone(),
                        rank: comment.rank,
                        editable: comment.editable,
                    });
                }
            }
        }
        Ok(feedback)
    }

    /// Hard delete a vendor profile
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    async fn save_comments(
        &self,
        id: &str,
        comments: Vec<Comment>,
        average_rating: f64,
    ) -> RepoResult<Vendor> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    comments = $comments,
                    average_rating = $average_rating
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("comments", comments))
            .bind(("average_rating", average_rating))
            .await?;

        result
            .take::<Option<Vendor>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))
    }
}
