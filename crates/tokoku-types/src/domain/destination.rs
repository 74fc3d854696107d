use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::required;

/// A shipping address ("alamat") owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: i64,
    pub id_user: i64,
    pub judul_alamat: String,
    pub nama_penerima: String,
    pub no_telp: String,
    pub detail_alamat: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Destination {
    pub fn apply(&mut self, patch: &DestinationPatch) {
        if let Some(v) = &patch.judul_alamat {
            self.judul_alamat = v.clone();
        }
        if let Some(v) = &patch.nama_penerima {
            self.nama_penerima = v.clone();
        }
        if let Some(v) = &patch.no_telp {
            self.no_telp = v.clone();
        }
        if let Some(v) = &patch.detail_alamat {
            self.detail_alamat = v.clone();
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationRequest {
    pub judul_alamat: String,
    pub nama_penerima: String,
    pub no_telp: String,
    pub detail_alamat: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDestination {
    pub judul_alamat: String,
    pub nama_penerima: String,
    pub no_telp: String,
    pub detail_alamat: String,
}

impl DestinationRequest {
    pub fn validate(&self) -> anyhow::Result<NewDestination> {
        Ok(NewDestination {
            judul_alamat: required("judul_alamat", &self.judul_alamat)?,
            nama_penerima: required("nama_penerima", &self.nama_penerima)?,
            no_telp: required("no_telp", &self.no_telp)?,
            detail_alamat: required("detail_alamat", &self.detail_alamat)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationUpdateRequest {
    #[serde(default)]
    pub judul_alamat: Option<String>,
    #[serde(default)]
    pub nama_penerima: Option<String>,
    #[serde(default)]
    pub no_telp: Option<String>,
    #[serde(default)]
    pub detail_alamat: Option<String>,
}

/// Fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationPatch {
    pub judul_alamat: Option<String>,
    pub nama_penerima: Option<String>,
    pub no_telp: Option<String>,
    pub detail_alamat: Option<String>,
}

impl DestinationUpdateRequest {
    /// Blank strings are treated as "not provided".
    pub fn into_patch(self) -> DestinationPatch {
        let keep = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        DestinationPatch {
            judul_alamat: keep(self.judul_alamat),
            nama_penerima: keep(self.nama_penerima),
            no_telp: keep(self.no_telp),
            detail_alamat: keep(self.detail_alamat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_required_on_create() {
        let req = DestinationRequest {
            judul_alamat: "Rumah".into(),
            nama_penerima: "Budi".into(),
            no_telp: "".into(),
            detail_alamat: "Jl. Merdeka 1".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn blank_update_fields_are_dropped() {
        let patch = DestinationUpdateRequest {
            nama_penerima: Some(" Ani ".into()),
            no_telp: Some("  ".into()),
            ..Default::default()
        }
        .into_patch();
        assert_eq!(patch.nama_penerima.as_deref(), Some("Ani"));
        assert_eq!(patch.no_telp, None);
        assert_eq!(patch.detail_alamat, None);
    }
}
