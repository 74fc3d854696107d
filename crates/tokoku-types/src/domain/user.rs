use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{optional, required};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nama: String,
    pub email: String,
    #[serde(rename = "notelp")]
    pub no_telp: String,
    /// bcrypt hash; never leaves the process.
    #[serde(skip_serializing, default)]
    pub kata_sandi: String,
    pub tanggal_lahir: Option<NaiveDate>,
    pub jenis_kelamin: Option<String>,
    pub tentang: Option<String>,
    pub pekerjaan: Option<String>,
    pub id_provinsi: String,
    pub id_kota: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(v) = &update.nama {
            self.nama = v.clone();
        }
        if let Some(v) = &update.email {
            self.email = v.clone();
        }
        if let Some(v) = &update.no_telp {
            self.no_telp = v.clone();
        }
        if let Some(v) = &update.kata_sandi {
            self.kata_sandi = v.clone();
        }
        if let Some(v) = update.tanggal_lahir {
            self.tanggal_lahir = Some(v);
        }
        if let Some(v) = &update.jenis_kelamin {
            self.jenis_kelamin = Some(v.clone());
        }
        if let Some(v) = &update.tentang {
            self.tentang = Some(v.clone());
        }
        if let Some(v) = &update.pekerjaan {
            self.pekerjaan = Some(v.clone());
        }
        if let Some(v) = &update.id_provinsi {
            self.id_provinsi = v.clone();
        }
        if let Some(v) = &update.id_kota {
            self.id_kota = v.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// A validated user ready to be stored. `kata_sandi` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nama: String,
    pub email: String,
    pub no_telp: String,
    pub kata_sandi: String,
    pub tanggal_lahir: Option<NaiveDate>,
    pub jenis_kelamin: Option<String>,
    pub tentang: Option<String>,
    pub pekerjaan: Option<String>,
    pub id_provinsi: String,
    pub id_kota: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub nama: String,
    pub email: String,
    #[serde(rename = "notelp")]
    pub no_telp: String,
    pub kata_sandi: String,
    pub id_provinsi: String,
    pub id_kota: String,
    #[serde(default)]
    pub tanggal_lahir: Option<String>,
    #[serde(default)]
    pub jenis_kelamin: Option<String>,
    #[serde(default)]
    pub tentang: Option<String>,
    #[serde(default)]
    pub pekerjaan: Option<String>,
}

impl RegisterRequest {
    /// Normalizes and checks every field. The returned request has trimmed
    /// values; the password is left untouched.
    pub fn validate(self) -> anyhow::Result<Self> {
        let nama = required("nama", &self.nama)?;
        let email = validate_email(&self.email)?;
        let no_telp = required("notelp", &self.no_telp)?;
        validate_password(&self.kata_sandi)?;
        let id_provinsi = required("id_provinsi", &self.id_provinsi)?;
        let id_kota = required("id_kota", &self.id_kota)?;
        parse_birth_date(self.tanggal_lahir.as_deref())?;
        Ok(Self {
            nama,
            email,
            no_telp,
            id_provinsi,
            id_kota,
            ..self
        })
    }

    pub fn into_new_user(self, password_hash: String) -> anyhow::Result<NewUser> {
        let tanggal_lahir = parse_birth_date(self.tanggal_lahir.as_deref())?;
        Ok(NewUser {
            nama: self.nama,
            email: self.email,
            no_telp: self.no_telp,
            kata_sandi: password_hash,
            tanggal_lahir,
            jenis_kelamin: non_blank(self.jenis_kelamin),
            tentang: non_blank(self.tentang),
            pekerjaan: non_blank(self.pekerjaan),
            id_provinsi: self.id_provinsi,
            id_kota: self.id_kota,
            is_admin: false,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub kata_sandi: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "notelp")]
    pub no_telp: Option<String>,
    #[serde(default)]
    pub kata_sandi: Option<String>,
    #[serde(default)]
    pub tanggal_lahir: Option<String>,
    #[serde(default)]
    pub jenis_kelamin: Option<String>,
    #[serde(default)]
    pub tentang: Option<String>,
    #[serde(default)]
    pub pekerjaan: Option<String>,
    #[serde(default)]
    pub id_provinsi: Option<String>,
    #[serde(default)]
    pub id_kota: Option<String>,
}

/// Column-level patch applied by the repositories. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub no_telp: Option<String>,
    pub kata_sandi: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub jenis_kelamin: Option<String>,
    pub tentang: Option<String>,
    pub pekerjaan: Option<String>,
    pub id_provinsi: Option<String>,
    pub id_kota: Option<String>,
}

impl UpdateProfileRequest {
    /// Validates the provided fields. The password is returned in clear text
    /// inside `kata_sandi`; callers hash it before storing.
    pub fn into_update(self) -> anyhow::Result<ProfileUpdate> {
        if let Some(pw) = &self.kata_sandi {
            validate_password(pw)?;
        }
        Ok(ProfileUpdate {
            nama: optional("nama", self.nama.as_deref())?,
            email: self.email.as_deref().map(validate_email).transpose()?,
            no_telp: optional("notelp", self.no_telp.as_deref())?,
            kata_sandi: self.kata_sandi,
            tanggal_lahir: parse_birth_date(self.tanggal_lahir.as_deref())?,
            jenis_kelamin: non_blank(self.jenis_kelamin),
            tentang: non_blank(self.tentang),
            pekerjaan: non_blank(self.pekerjaan),
            id_provinsi: optional("id_provinsi", self.id_provinsi.as_deref())?,
            id_kota: optional("id_kota", self.id_kota.as_deref())?,
        })
    }
}

fn validate_email(email: &str) -> anyhow::Result<String> {
    let email = required("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => anyhow::bail!("invalid email"),
    }
}

fn validate_password(password: &str) -> anyhow::Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        anyhow::bail!("kata_sandi must be at least {MIN_PASSWORD_LEN} characters");
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD`; blank input means "not provided".
pub fn parse_birth_date(value: Option<&str>) -> anyhow::Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| anyhow::anyhow!("tanggal_lahir must be YYYY-MM-DD")),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
