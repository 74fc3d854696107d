use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toko {
    pub id: i64,
    pub id_user: i64,
    pub nama_toko: String,
    pub url_foto: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Toko {
    /// Blank patch fields keep the current value.
    pub fn apply(&mut self, patch: &TokoUpdateRequest) {
        if let Some(nama) = non_blank(&patch.nama_toko) {
            self.nama_toko = nama;
        }
        if let Some(url) = non_blank(&patch.url_foto) {
            self.url_foto = url;
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> TokoSummary {
        TokoSummary {
            id: self.id,
            nama_toko: self.nama_toko.clone(),
            url_foto: self.url_foto.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokoSummary {
    pub id: i64,
    pub nama_toko: String,
    pub url_foto: String,
}

#[derive(Debug, Clone)]
pub struct NewToko {
    pub id_user: i64,
    pub nama_toko: String,
    pub url_foto: String,
}

impl NewToko {
    /// The shop every user gets on registration.
    pub fn default_for(id_user: i64, owner_name: &str) -> Self {
        Self {
            id_user,
            nama_toko: format!("{owner_name}'s Toko"),
            url_foto: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokoUpdateRequest {
    #[serde(default)]
    pub nama_toko: Option<String>,
    #[serde(default)]
    pub url_foto: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
