/// Database row types. These map directly to SQLite rows and are kept apart
/// from the adboard-types API shapes.
///
/// The password hash is written but never selected back, so no row type
/// carries it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisementRow {
    pub id: i64,
    pub header: String,
    pub description: String,
    /// SQLite `datetime('now')` format: `YYYY-MM-DD HH:MM:SS`, UTC.
    pub created_at: String,
    pub owner_id: Option<i64>,
}
