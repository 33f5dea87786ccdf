//! Database Models - row structs for the content tables and the mapping
//! between them and the content aggregate.

use sqlx::FromRow;

use crate::content::{
    media::MediaType, AboutBlock, CtaBlock, HeroBlock, PlansBlock, PricingPlan, Project,
    ServicesBlock, SiteContent, Socials, TextItem,
};
use crate::error::RepositoryError;

/// The single `site_settings` row: every scalar field of the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct SettingsRow {
    pub logo: String,
    pub site_name: String,
    pub admin_password: String,
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub linkedin: String,
    pub tiktok: String,
    pub hero_title_part1: String,
    pub hero_title_accent: String,
    pub hero_subtitle: String,
    pub hero_button_primary: String,
    pub hero_button_secondary: String,
    pub hero_image: String,
    pub services_title: String,
    pub services_subtitle: String,
    pub plans_title: String,
    pub plans_subtitle: String,
    pub about_title: String,
    pub cta_title: String,
    pub cta_text: String,
    pub cta_button_text: String,
    pub cta_whatsapp_number: String,
    pub cta_background_image: String,
}

/// Row of `service_items` or `about_items`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TextItemRow {
    pub position: i32,
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlanRow {
    pub position: i32,
    pub id: i64,
    pub name: String,
    pub price: String,
    pub period: String,
    pub button_text: String,
    pub is_popular: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FeatureRow {
    pub plan_position: i32,
    pub position: i32,
    pub feature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProjectRow {
    pub position: i32,
    pub id: i64,
    pub title: String,
    pub category: String,
    pub media_type: String,
    pub media: String,
    pub description: String,
    pub tech: String,
}

/// Every row needed to store one [`SiteContent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRows {
    pub settings: SettingsRow,
    pub services: Vec<TextItemRow>,
    pub about: Vec<TextItemRow>,
    pub plans: Vec<PlanRow>,
    pub features: Vec<FeatureRow>,
}

fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

fn text_rows(items: &[TextItem]) -> Vec<TextItemRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| TextItemRow {
            position: position(i),
            id: item.id,
            title: item.title.clone(),
            description: item.description.clone(),
        })
        .collect()
}

fn text_items(rows: Vec<TextItemRow>) -> Vec<TextItem> {
    rows.into_iter()
        .map(|r| TextItem {
            id: r.id,
            title: r.title,
            description: r.description,
        })
        .collect()
}

/// Split the aggregate into rows. Positions follow list order.
pub fn decompose_content(content: &SiteContent) -> ContentRows {
    let settings = SettingsRow {
        logo: content.logo.clone(),
        site_name: content.site_name.clone(),
        admin_password: content.admin_password.clone(),
        facebook: content.socials.facebook.clone(),
        instagram: content.socials.instagram.clone(),
        twitter: content.socials.twitter.clone(),
        linkedin: content.socials.linkedin.clone(),
        tiktok: content.socials.tiktok.clone(),
        hero_title_part1: content.hero.title_part1.clone(),
        hero_title_accent: content.hero.title_accent.clone(),
        hero_subtitle: content.hero.subtitle.clone(),
        hero_button_primary: content.hero.button_primary.clone(),
        hero_button_secondary: content.hero.button_secondary.clone(),
        hero_image: content.hero.image.clone(),
        services_title: content.services.section_title.clone(),
        services_subtitle: content.services.section_subtitle.clone(),
        plans_title: content.plans.section_title.clone(),
        plans_subtitle: content.plans.section_subtitle.clone(),
        about_title: content.about.section_title.clone(),
        cta_title: content.cta.title.clone(),
        cta_text: content.cta.text.clone(),
        cta_button_text: content.cta.button_text.clone(),
        cta_whatsapp_number: content.cta.whatsapp_number.clone(),
        cta_background_image: content.cta.background_image.clone(),
    };

    let mut plans = Vec::with_capacity(content.plans.items.len());
    let mut features = Vec::new();
    for (i, plan) in content.plans.items.iter().enumerate() {
        plans.push(PlanRow {
            position: position(i),
            id: plan.id,
            name: plan.name.clone(),
            price: plan.price.clone(),
            period: plan.period.clone(),
            button_text: plan.button_text.clone(),
            is_popular: plan.is_popular,
        });
        features.extend(plan.features.iter().enumerate().map(|(j, f)| FeatureRow {
            plan_position: position(i),
            position: position(j),
            feature: f.clone(),
        }));
    }

    ContentRows {
        settings,
        services: text_rows(&content.services.items),
        about: text_rows(&content.about.items),
        plans,
        features,
    }
}

/// Rebuild the aggregate. Rows are re-sorted by position, so callers may
/// pass them in any order.
pub fn assemble_content(mut rows: ContentRows) -> SiteContent {
    rows.services.sort_by_key(|r| r.position);
    rows.about.sort_by_key(|r| r.position);
    rows.plans.sort_by_key(|r| r.position);
    rows.features.sort_by_key(|f| (f.plan_position, f.position));

    let plans = rows
        .plans
        .into_iter()
        .map(|p| PricingPlan {
            features: rows
                .features
                .iter()
                .filter(|f| f.plan_position == p.position)
                .map(|f| f.feature.clone())
                .collect(),
            id: p.id,
            name: p.name,
            price: p.price,
            period: p.period,
            button_text: p.button_text,
            is_popular: p.is_popular,
        })
        .collect();

    let s = rows.settings;
    SiteContent {
        logo: s.logo,
        site_name: s.site_name,
        admin_password: s.admin_password,
        socials: Socials {
            facebook: s.facebook,
            instagram: s.instagram,
            twitter: s.twitter,
            linkedin: s.linkedin,
            tiktok: s.tiktok,
        },
        hero: HeroBlock {
            title_part1: s.hero_title_part1,
            title_accent: s.hero_title_accent,
            subtitle: s.hero_subtitle,
            button_primary: s.hero_button_primary,
            button_secondary: s.hero_button_secondary,
            image: s.hero_image,
        },
        services: ServicesBlock {
            section_title: s.services_title,
            section_subtitle: s.services_subtitle,
            items: text_items(rows.services),
        },
        plans: PlansBlock {
            section_title: s.plans_title,
            section_subtitle: s.plans_subtitle,
            items: plans,
        },
        about: AboutBlock {
            section_title: s.about_title,
            items: text_items(rows.about),
        },
        cta: CtaBlock {
            title: s.cta_title,
            text: s.cta_text,
            button_text: s.cta_button_text,
            whatsapp_number: s.cta_whatsapp_number,
            background_image: s.cta_background_image,
        },
    }
}

impl ProjectRow {
    pub fn from_project(index: usize, project: &Project) -> Self {
        Self {
            position: position(index),
            id: project.id,
            title: project.title.clone(),
            category: project.category.as_str().to_string(),
            media_type: project.media.kind().as_str().to_string(),
            media: project.media.value().to_string(),
            description: project.description.clone(),
            tech: project.tech.clone(),
        }
    }

    pub fn into_project(self) -> Result<Project, RepositoryError> {
        let category = self.category.parse().map_err(RepositoryError::Corrupt)?;
        let kind = MediaType::parse(&self.media_type).ok_or_else(|| {
            RepositoryError::Corrupt(format!("unknown media type '{}'", self.media_type))
        })?;
        Ok(Project {
            id: self.id,
            title: self.title,
            category,
            media: crate::content::ProjectMedia::new(kind, self.media),
            description: self.description,
            tech: self.tech,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{defaults, ProjectCategory, ProjectMedia};

    #[test]
    fn test_decompose_assigns_positions_in_list_order() {
        let content = defaults::site_content();
        let rows = decompose_content(&content);

        assert_eq!(rows.services.len(), content.services.items.len());
        assert_eq!(rows.services[2].position, 2);
        assert_eq!(rows.services[2].id, content.services.items[2].id);
        assert_eq!(rows.settings.cta_whatsapp_number, "521234567890");

        let total: usize = content.plans.items.iter().map(|p| p.features.len()).sum();
        assert_eq!(rows.features.len(), total);
    }

    #[test]
    fn test_assemble_restores_order_from_shuffled_rows() {
        let mut content = defaults::site_content();
        content.plans.items[1].features = vec!["A".into(), "".into(), "C".into()];
        let mut rows = decompose_content(&content);
        rows.services.reverse();
        rows.plans.reverse();
        rows.features.reverse();

        assert_eq!(assemble_content(rows), content);
    }

    #[test]
    fn test_empty_lists_assemble_empty() {
        let rows = ContentRows::default();
        let content = assemble_content(rows);
        assert!(content.services.items.is_empty());
        assert!(content.plans.items.is_empty());
        assert_eq!(content.site_name, "");
    }

    #[test]
    fn test_project_row_maps_media_columns() {
        let project = Project {
            id: 7,
            title: "Reel".into(),
            category: ProjectCategory::Redes,
            media: ProjectMedia::Video("https://vimeo.com/42".into()),
            description: String::new(),
            tech: "Premiere".into(),
        };
        let row = ProjectRow::from_project(3, &project);

        assert_eq!(row.position, 3);
        assert_eq!(row.category, "Redes");
        assert_eq!(row.media_type, "video");
        assert_eq!(row.media, "https://vimeo.com/42");
        assert_eq!(row.into_project().unwrap(), project);
    }

    #[test]
    fn test_unknown_category_is_corrupt() {
        let mut row = ProjectRow::from_project(0, &defaults::projects()[0]);
        row.category = "Print".into();
        assert!(matches!(row.into_project(), Err(RepositoryError::Corrupt(_))));
    }

    #[test]
    fn test_unknown_media_type_is_corrupt() {
        let mut row = ProjectRow::from_project(0, &defaults::projects()[0]);
        row.media_type = "audio".into();
        assert!(matches!(row.into_project(), Err(RepositoryError::Corrupt(_))));
    }
}
