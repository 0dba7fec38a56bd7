//! Vendor Model
//!
//! Vendor profiles embed their customer feedback; the average rating is the
//! arithmetic mean of comment ranks and is recomputed on every append.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use uuid::Uuid;
use validator::Validate;

pub type VendorId = RecordId;

/// Customer feedback comment, embedded in the vendor document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    pub rank: i32,
    pub text: String,
    /// Text stays editable by its author while this flag is set;
    /// rank is immutable after creation
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub editable: bool,
}

fn default_true() -> bool {
    true
}

impl Comment {
    pub fn new(customer: RecordId, rank: i32, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer,
            rank,
            text,
            editable: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<VendorId>,
    /// Owning user account
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub name: String,
    pub product_label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Vendor {
    /// Arithmetic mean of comment ranks, 0.0 when there are none
    pub fn mean_rating(comments: &[Comment]) -> f64 {
        if comments.is_empty() {
            return 0.0;
        }
        comments.iter().map(|c| c.rank as f64).sum::<f64>() / comments.len() as f64
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VendorCreate {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub product_label: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorUpdate {
    pub name: Option<String>,
    pub product_label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackCreate {
    #[validate(range(min = 1, max = 5))]
    pub rank: i32,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentEdit {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Flat projection of a customer's feedback across all vendors
#[derive(Debug, Clone, Serialize)]
pub struct CustomerFeedback {
    pub vendor_id: String,
    pub vendor_name: String,
    pub vendor_product: String,
    pub comment_id: String,
    pub text: String,
    pub rank: i32,
    pub editable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(rank: i32) -> Comment {
        Comment::new("user:c1".parse().unwrap(), rank, "ok".into())
    }

    #[test]
    fn mean_rating_is_arithmetic_mean() {
        assert_eq!(Vendor::mean_rating(&[]), 0.0);
        assert_eq!(Vendor::mean_rating(&[comment(4)]), 4.0);
        assert_eq!(Vendor::mean_rating(&[comment(3), comment(4)]), 3.5);
    }
}
