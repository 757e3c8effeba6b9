//! Database repository for CRUD operations.
//!
//! Child rows are stored separately and joined at read time; every read goes
//! through the normalizer before leaving the repository.

use std::collections::HashMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::errors::AppError;
use crate::models::{
    AdminSession, Business, BusinessForm, BusinessRecord, CustomSectionRow, PhotoRow,
    TestimonialRow, WritePayload,
};
use crate::normalize::{denormalize_for_write, normalize_for_read};

const BUSINESS_COLUMNS: &str = "id, slug, name, phone, hours, services, address, map_embed_url, google_maps_url, primary_color, template, active, created_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== BUSINESS OPERATIONS ====================

    /// List all businesses, newest first, regardless of `active`.
    pub async fn list_businesses(&self) -> Result<Vec<Business>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM businesses ORDER BY created_at DESC, rowid DESC",
            BUSINESS_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut photos: HashMap<String, Vec<PhotoRow>> = HashMap::new();
        for row in sqlx::query(
            "SELECT business_id, file_url, display_order FROM photos ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        {
            photos
                .entry(row.get("business_id"))
                .or_default()
                .push(photo_from_row(&row));
        }

        let mut testimonials: HashMap<String, Vec<TestimonialRow>> = HashMap::new();
        for row in sqlx::query(
            "SELECT business_id, rating, text, author, display_order FROM testimonials ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        {
            testimonials
                .entry(row.get("business_id"))
                .or_default()
                .push(testimonial_from_row(&row));
        }

        let mut sections: HashMap<String, Vec<CustomSectionRow>> = HashMap::new();
        for row in sqlx::query(
            "SELECT business_id, title, content, display_order FROM custom_sections ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        {
            sections
                .entry(row.get("business_id"))
                .or_default()
                .push(custom_section_from_row(&row));
        }

        Ok(rows
            .iter()
            .map(|row| {
                let mut record = record_from_row(row);
                record.photos = photos.remove(&record.id).unwrap_or_default();
                record.testimonials = testimonials.remove(&record.id).unwrap_or_default();
                record.custom_sections = sections.remove(&record.id).unwrap_or_default();
                normalize_for_read(record)
            })
            .collect())
    }

    /// Get a business by ID, published or not.
    pub async fn get_business(&self, id: &str) -> Result<Option<Business>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM businesses WHERE id = ?",
            BUSINESS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_with_children(&row).await?)),
            None => Ok(None),
        }
    }

    /// Look up a published business by slug.
    ///
    /// Inactive businesses are indistinguishable from missing ones.
    pub async fn get_active_business_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Business>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM businesses WHERE slug = ? AND active = 1",
            BUSINESS_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_with_children(&row).await?)),
            None => Ok(None),
        }
    }

    /// Create a new, published business with its children.
    pub async fn create_business(&self, form: &BusinessForm) -> Result<Business, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp(Utc::now());
        let payload = denormalize_for_write(form, &id, None);
        let parent = &payload.business;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO businesses
                (id, slug, name, phone, hours, services, address, map_embed_url, google_maps_url,
                 primary_color, template, active, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)"#,
        )
        .bind(&id)
        .bind(&parent.slug)
        .bind(&parent.name)
        .bind(&parent.phone)
        .bind(&parent.hours)
        .bind(&parent.services)
        .bind(&parent.address)
        .bind(&parent.map_embed_url)
        .bind(&parent.google_maps_url)
        .bind(&parent.primary_color)
        .bind(&parent.template)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        insert_children(&mut tx, &payload).await?;

        tx.commit().await?;

        self.reload(&id).await
    }

    /// Replace a business's scalars and all of its children.
    ///
    /// The slug assigned at creation is kept. Children absent from the form
    /// are removed.
    pub async fn update_business(
        &self,
        id: &str,
        form: &BusinessForm,
    ) -> Result<Business, AppError> {
        let existing_slug: Option<String> =
            sqlx::query_scalar("SELECT slug FROM businesses WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let existing_slug =
            existing_slug.ok_or_else(|| AppError::NotFound(format!("Business {} not found", id)))?;

        let now = timestamp(Utc::now());
        let payload = denormalize_for_write(form, id, Some(existing_slug.as_str()));
        let parent = &payload.business;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE businesses SET
                slug = ?, name = ?, phone = ?, hours = ?, services = ?, address = ?,
                map_embed_url = ?, google_maps_url = ?, primary_color = ?, template = ?,
                updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&parent.slug)
        .bind(&parent.name)
        .bind(&parent.phone)
        .bind(&parent.hours)
        .bind(&parent.services)
        .bind(&parent.address)
        .bind(&parent.map_embed_url)
        .bind(&parent.google_maps_url)
        .bind(&parent.primary_color)
        .bind(&parent.template)
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Deleted between the slug lookup and the update
            return Err(AppError::NotFound(format!("Business {} not found", id)));
        }

        for table in ["photos", "testimonials", "custom_sections"] {
            sqlx::query(&format!("DELETE FROM {} WHERE business_id = ?", table))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        insert_children(&mut tx, &payload).await?;

        tx.commit().await?;

        self.reload(id).await
    }

    /// Delete a business. Child rows cascade.
    pub async fn delete_business(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Business {} not found", id)));
        }

        Ok(())
    }

    /// Flip the publication flag.
    pub async fn toggle_business_active(&self, id: &str) -> Result<Business, AppError> {
        let now = timestamp(Utc::now());
        let result = sqlx::query(
            "UPDATE businesses SET active = CASE active WHEN 0 THEN 1 ELSE 0 END, updated_at = ? WHERE id = ?",
        )
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Business {} not found", id)));
        }

        self.reload(id).await
    }

    /// Set the publication flag explicitly.
    pub async fn set_business_active(&self, id: &str, active: bool) -> Result<Business, AppError> {
        let now = timestamp(Utc::now());
        let result =
            sqlx::query("UPDATE businesses SET active = ?, updated_at = ? WHERE id = ?")
                .bind(active as i32)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Business {} not found", id)));
        }

        self.reload(id).await
    }

    async fn reload(&self, id: &str) -> Result<Business, AppError> {
        self.get_business(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Business {} not found", id)))
    }

    async fn load_with_children(&self, row: &SqliteRow) -> Result<Business, AppError> {
        let mut record = record_from_row(row);

        record.photos = sqlx::query(
            "SELECT file_url, display_order FROM photos WHERE business_id = ? ORDER BY id",
        )
        .bind(&record.id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(photo_from_row)
        .collect();

        record.testimonials = sqlx::query(
            "SELECT rating, text, author, display_order FROM testimonials WHERE business_id = ? ORDER BY id",
        )
        .bind(&record.id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(testimonial_from_row)
        .collect();

        record.custom_sections = sqlx::query(
            "SELECT title, content, display_order FROM custom_sections WHERE business_id = ? ORDER BY id",
        )
        .bind(&record.id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(custom_section_from_row)
        .collect();

        Ok(normalize_for_read(record))
    }

    // ==================== SESSION OPERATIONS ====================

    /// Create a server-side admin session.
    pub async fn create_session(
        &self,
        email: &str,
        ttl: Duration,
    ) -> Result<AdminSession, AppError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let created_at = timestamp(now);
        let expires_at = timestamp(now + ttl);

        sqlx::query(
            "INSERT INTO sessions (token, email, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(email)
        .bind(&created_at)
        .bind(&expires_at)
        .execute(&self.pool)
        .await?;

        Ok(AdminSession {
            token,
            email: email.to_string(),
            created_at,
            expires_at,
        })
    }

    /// Get an unexpired session by token.
    pub async fn get_session(&self, token: &str) -> Result<Option<AdminSession>, AppError> {
        let row = sqlx::query(
            "SELECT token, email, created_at, expires_at FROM sessions WHERE token = ? AND expires_at > ?",
        )
        .bind(token)
        .bind(timestamp(Utc::now()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| AdminSession {
            token: row.get("token"),
            email: row.get("email"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }))
    }

    /// Delete a session. Unknown tokens are ignored.
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove expired sessions and return how many were deleted.
    pub async fn purge_expired_sessions(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(timestamp(Utc::now()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

async fn insert_children(
    tx: &mut Transaction<'_, Sqlite>,
    payload: &WritePayload,
) -> Result<(), AppError> {
    for photo in &payload.photos {
        sqlx::query("INSERT INTO photos (business_id, file_url, display_order) VALUES (?, ?, ?)")
            .bind(&photo.business_id)
            .bind(&photo.file_url)
            .bind(photo.display_order)
            .execute(&mut **tx)
            .await?;
    }

    for testimonial in &payload.testimonials {
        sqlx::query(
            "INSERT INTO testimonials (business_id, rating, text, author, display_order) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&testimonial.business_id)
        .bind(testimonial.rating)
        .bind(&testimonial.text)
        .bind(&testimonial.author)
        .bind(testimonial.display_order)
        .execute(&mut **tx)
        .await?;
    }

    for section in &payload.custom_sections {
        sqlx::query(
            "INSERT INTO custom_sections (business_id, title, content, display_order) VALUES (?, ?, ?, ?)",
        )
        .bind(&section.business_id)
        .bind(&section.title)
        .bind(&section.content)
        .bind(section.display_order)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

// Fixed-width UTC timestamps so ordering and expiry can be compared as text in SQL.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Helper functions for row conversion

fn record_from_row(row: &SqliteRow) -> BusinessRecord {
    let active: i32 = row.get("active");
    BusinessRecord {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        phone: row.get("phone"),
        hours: row.get("hours"),
        services: row.get("services"),
        address: row.get("address"),
        map_embed_url: row.get("map_embed_url"),
        google_maps_url: row.get("google_maps_url"),
        primary_color: row.get("primary_color"),
        template: row.get("template"),
        active: active != 0,
        created_at: row.get("created_at"),
        photos: Vec::new(),
        testimonials: Vec::new(),
        custom_sections: Vec::new(),
    }
}

fn photo_from_row(row: &SqliteRow) -> PhotoRow {
    PhotoRow {
        file_url: row.get("file_url"),
        display_order: row.get("display_order"),
    }
}

fn testimonial_from_row(row: &SqliteRow) -> TestimonialRow {
    TestimonialRow {
        rating: row.get("rating"),
        text: row.get("text"),
        author: row.get("author"),
        display_order: row.get("display_order"),
    }
}

fn custom_section_from_row(row: &SqliteRow) -> CustomSectionRow {
    CustomSectionRow {
        title: row.get("title"),
        content: row.get("content"),
        display_order: row.get("display_order"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{CustomSection, Template, Testimonial};
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        (Repository::new(pool), temp_dir)
    }

    fn form(name: &str) -> BusinessForm {
        BusinessForm {
            name: name.to_string(),
            phone: "555-0100".to_string(),
            hours: "9-5".to_string(),
            services: "Everything".to_string(),
            address: "Main St".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let (repo, _dir) = repo().await;

        let mut submitted = form("Joe's Plumbing & Heating!!");
        submitted.photos = vec!["1.jpg".into(), "2.jpg".into(), "3.jpg".into()];
        submitted.testimonials = vec![
            Testimonial {
                rating: 5,
                text: "Great".into(),
                author: "A".into(),
            },
            Testimonial {
                rating: 3,
                text: "Fine".into(),
                author: "B".into(),
            },
        ];

        let created = repo.create_business(&submitted).await.unwrap();

        assert_eq!(created.slug, "joe-s-plumbing-heating");
        assert!(created.active);
        assert_eq!(created.photos, vec!["1.jpg", "2.jpg", "3.jpg"]);
        assert_eq!(created.testimonials.len(), 2);
        assert!(created.custom_sections.is_empty());
        assert_eq!(created.template, Template::Classic);
        assert_eq!(created.primary_color, "#2563eb");
    }

    #[tokio::test]
    async fn test_update_replaces_children_and_keeps_slug() {
        let (repo, _dir) = repo().await;

        let mut submitted = form("Original Name");
        submitted.photos = vec!["a.jpg".into(), "b.jpg".into()];
        submitted.custom_sections = vec![CustomSection {
            title: "Old".into(),
            content: "gone".into(),
        }];
        let created = repo.create_business(&submitted).await.unwrap();

        let mut edited = created.to_form();
        edited.name = "New Name".into();
        edited.photos = vec!["c.jpg".into()];
        edited.custom_sections.clear();
        edited.template = Some(Template::Modern);

        let updated = repo.update_business(&created.id, &edited).await.unwrap();

        assert_eq!(updated.slug, "original-name");
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.photos, vec!["c.jpg"]);
        assert!(updated.custom_sections.is_empty());
        assert_eq!(updated.template, Template::Modern);
    }

    #[tokio::test]
    async fn test_resave_preserves_order() {
        let (repo, _dir) = repo().await;

        let mut submitted = form("Ordered");
        submitted.photos = vec!["x.jpg".into(), "y.jpg".into(), "z.jpg".into()];
        let created = repo.create_business(&submitted).await.unwrap();

        let resaved = repo
            .update_business(&created.id, &created.to_form())
            .await
            .unwrap();

        assert_eq!(resaved.photos, created.photos);
    }

    #[tokio::test]
    async fn test_inactive_hidden_from_slug_lookup() {
        let (repo, _dir) = repo().await;

        let created = repo.create_business(&form("Hidden Co")).await.unwrap();
        assert!(repo
            .get_active_business_by_slug("hidden-co")
            .await
            .unwrap()
            .is_some());

        let toggled = repo.toggle_business_active(&created.id).await.unwrap();
        assert!(!toggled.active);
        assert!(repo
            .get_active_business_by_slug("hidden-co")
            .await
            .unwrap()
            .is_none());

        // Still visible to the admin listing
        let all = repo.list_businesses().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].active);

        let restored = repo.set_business_active(&created.id, true).await.unwrap();
        assert!(restored.active);
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let (repo, _dir) = repo().await;

        repo.create_business(&form("Same Name")).await.unwrap();
        let err = repo.create_business(&form("Same  Name!")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_children() {
        let (repo, _dir) = repo().await;

        let mut submitted = form("Doomed");
        submitted.photos = vec!["p.jpg".into()];
        let created = repo.create_business(&submitted).await.unwrap();

        repo.delete_business(&created.id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(matches!(
            repo.delete_business(&created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let (repo, _dir) = repo().await;

        repo.create_business(&form("First")).await.unwrap();
        repo.create_business(&form("Second")).await.unwrap();

        let names: Vec<String> = repo
            .list_businesses()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (repo, _dir) = repo().await;

        let session = repo
            .create_session("admin@example.com", Duration::hours(1))
            .await
            .unwrap();
        let found = repo.get_session(&session.token).await.unwrap().unwrap();
        assert_eq!(found.email, "admin@example.com");

        repo.delete_session(&session.token).await.unwrap();
        assert!(repo.get_session(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_rejected_and_purged() {
        let (repo, _dir) = repo().await;

        let session = repo
            .create_session("admin@example.com", Duration::hours(-1))
            .await
            .unwrap();

        assert!(repo.get_session(&session.token).await.unwrap().is_none());
        assert_eq!(repo.purge_expired_sessions().await.unwrap(), 1);
    }
}
