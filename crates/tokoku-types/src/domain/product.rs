use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slug::slugify;

use super::category::CategorySummary;
use super::required;
use super::toko::TokoSummary;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub id_toko: i64,
    pub id_category: i64,
    pub nama_produk: String,
    pub slug: String,
    pub harga_reseller: i64,
    pub harga_konsumen: i64,
    pub stok: i64,
    pub deskripsi: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPhoto {
    pub id: i64,
    pub id_produk: i64,
    pub url: String,
}

/// A product joined with its shop, category and photos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub toko: Option<TokoSummary>,
    pub category: Option<CategorySummary>,
    pub photos: Vec<ProductPhoto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRequest {
    pub id_category: i64,
    pub nama_produk: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub harga_reseller: i64,
    pub harga_konsumen: i64,
    pub stok: i64,
    #[serde(default)]
    pub deskripsi: String,
    /// Photo URLs. On update an empty list keeps the existing photos.
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Validated product fields, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub id_category: i64,
    pub nama_produk: String,
    pub slug: String,
    pub harga_reseller: i64,
    pub harga_konsumen: i64,
    pub stok: i64,
    pub deskripsi: String,
    pub photos: Vec<String>,
}

impl ProductRequest {
    pub fn into_draft(self) -> anyhow::Result<ProductDraft> {
        let nama_produk = required("nama_produk", &self.nama_produk)?;
        if self.id_category <= 0 {
            anyhow::bail!("id_category required");
        }
        if self.harga_konsumen <= 0 {
            anyhow::bail!("harga_konsumen must be > 0");
        }
        if self.harga_reseller < 0 {
            anyhow::bail!("harga_reseller must be >= 0");
        }
        if self.stok < 0 {
            anyhow::bail!("stok must be >= 0");
        }
        let slug = match self.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => slugify(s),
            _ => slugify(&nama_produk),
        };
        if slug.is_empty() {
            anyhow::bail!("slug must contain letters or digits");
        }
        let photos = self
            .photos
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Ok(ProductDraft {
            id_category: self.id_category,
            nama_produk,
            slug,
            harga_reseller: self.harga_reseller,
            harga_konsumen: self.harga_konsumen,
            stok: self.stok,
            deskripsi: self.deskripsi.trim().to_string(),
            photos,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub nama_produk: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub toko_id: Option<i64>,
    #[serde(default)]
    pub min_harga: Option<i64>,
    #[serde(default)]
    pub max_harga: Option<i64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ProductFilter {
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }

    pub fn name_term(&self) -> Option<&str> {
        self.nama_produk
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// In-process evaluation of the filter; the sqlite adapter builds the
    /// equivalent WHERE clause instead.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.name_term() {
            if !product
                .nama_produk
                .to_lowercase()
                .contains(&term.to_lowercase())
            {
                return false;
            }
        }
        if self.category_id.is_some_and(|c| c != product.id_category) {
            return false;
        }
        if self.toko_id.is_some_and(|t| t != product.id_toko) {
            return false;
        }
        if self.min_harga.is_some_and(|m| product.harga_konsumen < m) {
            return false;
        }
        if self.max_harga.is_some_and(|m| product.harga_konsumen > m) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProductRequest {
        ProductRequest {
            id_category: 1,
            nama_produk: "Kopi Gayo 250g".into(),
            slug: None,
            harga_reseller: 40_000,
            harga_konsumen: 50_000,
            stok: 10,
            deskripsi: "arabika".into(),
            photos: vec!["a.jpg".into(), " ".into()],
        }
    }

    #[test]
    fn slug_defaults_to_name() {
        let draft = request().into_draft().unwrap();
        assert_eq!(draft.slug, "kopi-gayo-250g");
        assert_eq!(draft.photos, vec!["a.jpg".to_string()]);
    }

    #[test]
    fn slug_collapses_separators() {
        let mut r = request();
        r.slug = Some("  Teh -- Hijau!! ".into());
        assert_eq!(r.into_draft().unwrap().slug, "teh-hijau");
    }

    #[test]
    fn slug_transliterates_non_ascii_names() {
        let mut r = request();
        r.nama_produk = "Kopi Café Susu".into();
        assert_eq!(r.into_draft().unwrap().slug, "kopi-cafe-susu");

        let mut r = request();
        r.nama_produk = "日本茶".into();
        let slug = r.into_draft().unwrap().slug;
        assert!(!slug.is_empty());
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }

    #[test]
    fn slug_without_letters_is_rejected() {
        let mut r = request();
        r.nama_produk = "***".into();
        assert!(r.into_draft().is_err());

        let mut r = request();
        r.slug = Some("!!!".into());
        assert!(r.into_draft().is_err());
    }

    #[test]
    fn invalid_products_are_rejected() {
        let mut r = request();
        r.harga_konsumen = 0;
        assert!(r.into_draft().is_err());

        let mut r = request();
        r.stok = -1;
        assert!(r.into_draft().is_err());

        let mut r = request();
        r.nama_produk = " ".into();
        assert!(r.into_draft().is_err());
    }

    #[test]
    fn filter_pagination_defaults() {
        let f = ProductFilter::default();
        assert_eq!((f.page(), f.limit(), f.offset()), (1, 10, 0));

        let f = ProductFilter {
            page: Some(3),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!((f.page(), f.limit(), f.offset()), (3, 100, 200));
    }

    #[test]
    fn filter_matches_price_range_and_name() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            id_toko: 2,
            id_category: 3,
            nama_produk: "Kopi Gayo".into(),
            slug: "kopi-gayo".into(),
            harga_reseller: 1,
            harga_konsumen: 50,
            stok: 1,
            deskripsi: String::new(),
            created_at: now,
            updated_at: now,
        };
        let f = ProductFilter {
            nama_produk: Some("gayo".into()),
            min_harga: Some(10),
            max_harga: Some(50),
            ..Default::default()
        };
        assert!(f.matches(&product));
        let f = ProductFilter {
            toko_id: Some(9),
            ..Default::default()
        };
        assert!(!f.matches(&product));
    }
}
