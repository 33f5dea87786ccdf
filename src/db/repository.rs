//! Content Repository
//! Storage behind the REST persistence endpoints: Postgres when a pool is
//! available, an in-memory copy otherwise.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::models::{
    assemble_content, decompose_content, ContentRows, FeatureRow, PlanRow, ProjectRow,
    SettingsRow, TextItemRow,
};
use crate::content::{defaults, Project, SiteContent};
use crate::error::RepositoryError;

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Short name reported by the storage health check.
    fn backend(&self) -> &'static str;

    /// `None` when no content was ever stored.
    async fn load_content(&self) -> Result<Option<SiteContent>, RepositoryError>;

    /// Stored order, newest first.
    async fn load_projects(&self) -> Result<Vec<Project>, RepositoryError>;

    /// Replace the stored content, and the project list when given, as one
    /// atomic write.
    async fn save(
        &self,
        content: &SiteContent,
        projects: Option<&[Project]>,
    ) -> Result<(), RepositoryError>;

    async fn health_check(&self) -> Result<Duration, RepositoryError>;
}

// ============================================================================
// Postgres
// ============================================================================

const SETTINGS_COLUMNS: [&str; 24] = [
    "logo",
    "site_name",
    "admin_password",
    "facebook",
    "instagram",
    "twitter",
    "linkedin",
    "tiktok",
    "hero_title_part1",
    "hero_title_accent",
    "hero_subtitle",
    "hero_button_primary",
    "hero_button_secondary",
    "hero_image",
    "services_title",
    "services_subtitle",
    "plans_title",
    "plans_subtitle",
    "about_title",
    "cta_title",
    "cta_text",
    "cta_button_text",
    "cta_whatsapp_number",
    "cta_background_image",
];

/// Values in [`SETTINGS_COLUMNS`] order.
fn settings_values(s: &SettingsRow) -> [&str; 24] {
    [
        &s.logo,
        &s.site_name,
        &s.admin_password,
        &s.facebook,
        &s.instagram,
        &s.twitter,
        &s.linkedin,
        &s.tiktok,
        &s.hero_title_part1,
        &s.hero_title_accent,
        &s.hero_subtitle,
        &s.hero_button_primary,
        &s.hero_button_secondary,
        &s.hero_image,
        &s.services_title,
        &s.services_subtitle,
        &s.plans_title,
        &s.plans_subtitle,
        &s.about_title,
        &s.cta_title,
        &s.cta_text,
        &s.cta_button_text,
        &s.cta_whatsapp_number,
        &s.cta_background_image,
    ]
}

fn insert_settings_sql() -> String {
    let placeholders: Vec<String> = (1..=SETTINGS_COLUMNS.len())
        .map(|i| format!("${}", i))
        .collect();
    format!(
        "INSERT INTO site_settings (id, {}) VALUES (1, {})",
        SETTINGS_COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store the compiled-in defaults when the tables are empty. Returns
    /// whether anything was written.
    pub async fn seed_if_empty(&self) -> Result<bool, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM site_settings")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(false);
        }
        let projects = defaults::projects();
        self.save(&defaults::site_content(), Some(&projects)).await?;
        tracing::info!("Seeded site content with defaults");
        Ok(true)
    }

    async fn insert_text_items(
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        rows: &[TextItemRow],
    ) -> Result<(), sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} (position, id, title, description) VALUES ($1, $2, $3, $4)",
            table
        );
        for row in rows {
            sqlx::query(&sql)
                .bind(row.position)
                .bind(row.id)
                .bind(&row.title)
                .bind(&row.description)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn write_content(
        tx: &mut Transaction<'_, Postgres>,
        rows: &ContentRows,
    ) -> Result<(), sqlx::Error> {
        for table in ["plan_features", "pricing_plans", "service_items", "about_items", "site_settings"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut **tx)
                .await?;
        }

        let sql = insert_settings_sql();
        let mut insert = sqlx::query(&sql);
        for value in settings_values(&rows.settings) {
            insert = insert.bind(value);
        }
        insert.execute(&mut **tx).await?;

        Self::insert_text_items(tx, "service_items", &rows.services).await?;
        Self::insert_text_items(tx, "about_items", &rows.about).await?;

        for plan in &rows.plans {
            sqlx::query(
                "INSERT INTO pricing_plans (position, id, name, price, period, button_text, is_popular) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(plan.position)
            .bind(plan.id)
            .bind(&plan.name)
            .bind(&plan.price)
            .bind(&plan.period)
            .bind(&plan.button_text)
            .bind(plan.is_popular)
            .execute(&mut **tx)
            .await?;
        }

        for feature in &rows.features {
            sqlx::query(
                "INSERT INTO plan_features (plan_position, position, feature) VALUES ($1, $2, $3)",
            )
            .bind(feature.plan_position)
            .bind(feature.position)
            .bind(&feature.feature)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn write_projects(
        tx: &mut Transaction<'_, Postgres>,
        projects: &[Project],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM projects").execute(&mut **tx).await?;
        for (i, project) in projects.iter().enumerate() {
            let row = ProjectRow::from_project(i, project);
            sqlx::query(
                "INSERT INTO projects (position, id, title, category, media_type, media, description, tech) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(row.position)
            .bind(row.id)
            .bind(&row.title)
            .bind(&row.category)
            .bind(&row.media_type)
            .bind(&row.media)
            .bind(&row.description)
            .bind(&row.tech)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for PgRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn load_content(&self) -> Result<Option<SiteContent>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM site_settings WHERE id = 1",
            SETTINGS_COLUMNS.join(", ")
        );
        let Some(settings) = sqlx::query_as::<_, SettingsRow>(&sql)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let services = sqlx::query_as::<_, TextItemRow>(
            "SELECT position, id, title, description FROM service_items ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;
        let about = sqlx::query_as::<_, TextItemRow>(
            "SELECT position, id, title, description FROM about_items ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;
        let plans = sqlx::query_as::<_, PlanRow>(
            "SELECT position, id, name, price, period, button_text, is_popular \
             FROM pricing_plans ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;
        let features = sqlx::query_as::<_, FeatureRow>(
            "SELECT plan_position, position, feature FROM plan_features \
             ORDER BY plan_position, position",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(assemble_content(ContentRows {
            settings,
            services,
            about,
            plans,
            features,
        })))
    }

    async fn load_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        sqlx::query_as::<_, ProjectRow>(
            "SELECT position, id, title, category, media_type, media, description, tech \
             FROM projects ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ProjectRow::into_project)
        .collect()
    }

    async fn save(
        &self,
        content: &SiteContent,
        projects: Option<&[Project]>,
    ) -> Result<(), RepositoryError> {
        let rows = decompose_content(content);

        let mut tx = self.pool.begin().await?;
        Self::write_content(&mut tx, &rows).await?;
        if let Some(projects) = projects {
            Self::write_projects(&mut tx, projects).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            projects = projects.map(<[Project]>::len),
            "site content written"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<Duration, RepositoryError> {
        Ok(super::health_check(&self.pool).await?)
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default)]
struct Snapshot {
    content: Option<SiteContent>,
    projects: Vec<Project>,
}

/// Process-local storage. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: RwLock<Snapshot>,
}

impl MemoryRepository {
    /// Nothing stored yet; content reads as `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pre-filled with the compiled-in defaults.
    pub fn seeded() -> Self {
        Self {
            inner: RwLock::new(Snapshot {
                content: Some(defaults::site_content()),
                projects: defaults::projects(),
            }),
        }
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn load_content(&self) -> Result<Option<SiteContent>, RepositoryError> {
        Ok(self.inner.read().await.content.clone())
    }

    async fn load_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.inner.read().await.projects.clone())
    }

    async fn save(
        &self,
        content: &SiteContent,
        projects: Option<&[Project]>,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.content = Some(content.clone());
        if let Some(projects) = projects {
            inner.projects = projects.to_vec();
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<Duration, RepositoryError> {
        let start = Instant::now();
        drop(self.inner.read().await);
        Ok(start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_settings_sql_binds_every_column() {
        let sql = insert_settings_sql();
        assert!(sql.starts_with("INSERT INTO site_settings (id, logo, site_name"));
        assert!(sql.ends_with("$24)"));
        assert!(!sql.contains("$25"));
    }

    #[test]
    fn test_settings_values_follow_column_order() {
        let rows = decompose_content(&defaults::site_content());
        let values = settings_values(&rows.settings);
        let at = |name: &str| SETTINGS_COLUMNS.iter().position(|c| *c == name).unwrap();

        assert_eq!(values[at("site_name")], "Digital Agency");
        assert_eq!(values[at("admin_password")], "admin123");
        assert_eq!(values[at("cta_whatsapp_number")], "521234567890");
    }

    #[tokio::test]
    async fn test_empty_memory_repository_has_no_content() {
        let repo = MemoryRepository::empty();
        assert_eq!(repo.load_content().await.unwrap(), None);
        assert!(repo.load_projects().await.unwrap().is_empty());
        assert_eq!(repo.backend(), "memory");
    }

    #[tokio::test]
    async fn test_memory_save_replaces_content_and_keeps_projects_when_absent() {
        let repo = MemoryRepository::seeded();
        let content = SiteContent {
            site_name: "Acme Co".into(),
            ..defaults::site_content()
        };

        repo.save(&content, None).await.unwrap();
        assert_eq!(repo.load_content().await.unwrap(), Some(content.clone()));
        assert_eq!(repo.load_projects().await.unwrap(), defaults::projects());

        repo.save(&content, Some(&[][..])).await.unwrap();
        assert!(repo.load_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_health_check_succeeds() {
        assert!(MemoryRepository::seeded().health_check().await.is_ok());
    }
}
