use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::required;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub nama_category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            nama_category: self.nama_category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub nama_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub nama_category: String,
}

impl CategoryRequest {
    pub fn validated_name(&self) -> anyhow::Result<String> {
        required("nama_category", &self.nama_category)
    }
}
