//! Typed draft edits. One variant per editable field group, so an edit can
//! only name fields that exist.

use crate::content::{SiteContent, SocialNetwork, TextItem};
use crate::error::EditError;

use super::editor::split_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroField {
    TitlePart1,
    TitleAccent,
    Subtitle,
    ButtonPrimary,
    ButtonSecondary,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Title,
    Subtitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtaField {
    Title,
    Text,
    ButtonText,
    WhatsappNumber,
    BackgroundImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanChange {
    Name(String),
    Price(String),
    Period(String),
    ButtonText(String),
    Popular(bool),
    Features(Vec<String>),
    /// Multi-line text, one feature per line; blank lines are kept.
    FeaturesText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEdit {
    SiteName(String),
    Logo(String),
    AdminPassword(String),
    Social(SocialNetwork, String),
    Hero(HeroField, String),
    ServicesHeader(HeaderField, String),
    Service {
        index: usize,
        field: ItemField,
        value: String,
    },
    PlansHeader(HeaderField, String),
    Plan {
        index: usize,
        change: PlanChange,
    },
    AboutTitle(String),
    Reason {
        index: usize,
        field: ItemField,
        value: String,
    },
    Cta(CtaField, String),
}

fn item_at<'a, T>(
    items: &'a mut [T],
    section: &'static str,
    index: usize,
) -> Result<&'a mut T, EditError> {
    items
        .get_mut(index)
        .ok_or(EditError::NoSuchItem { section, index })
}

fn set_item_field(item: &mut TextItem, field: ItemField, value: String) {
    match field {
        ItemField::Title => item.title = value,
        ItemField::Description => item.description = value,
    }
}

impl ContentEdit {
    /// Apply to `content` in place. Only the addressed field changes; list
    /// order and sibling fields are untouched.
    pub fn apply(self, content: &mut SiteContent) -> Result<(), EditError> {
        match self {
            ContentEdit::SiteName(v) => content.site_name = v,
            ContentEdit::Logo(v) => content.logo = v,
            ContentEdit::AdminPassword(v) => content.admin_password = v,
            ContentEdit::Social(network, v) => *content.socials.get_mut(network) = v,
            ContentEdit::Hero(field, v) => {
                let hero = &mut content.hero;
                match field {
                    HeroField::TitlePart1 => hero.title_part1 = v,
                    HeroField::TitleAccent => hero.title_accent = v,
                    HeroField::Subtitle => hero.subtitle = v,
                    HeroField::ButtonPrimary => hero.button_primary = v,
                    HeroField::ButtonSecondary => hero.button_secondary = v,
                    HeroField::Image => hero.image = v,
                }
            }
            ContentEdit::ServicesHeader(field, v) => match field {
                HeaderField::Title => content.services.section_title = v,
                HeaderField::Subtitle => content.services.section_subtitle = v,
            },
            ContentEdit::Service {
                index,
                field,
                value,
            } => {
                let item = item_at(&mut content.services.items, "services", index)?;
                set_item_field(item, field, value);
            }
            ContentEdit::PlansHeader(field, v) => match field {
                HeaderField::Title => content.plans.section_title = v,
                HeaderField::Subtitle => content.plans.section_subtitle = v,
            },
            ContentEdit::Plan { index, change } => {
                let plan = item_at(&mut content.plans.items, "plans", index)?;
                match change {
                    PlanChange::Name(v) => plan.name = v,
                    PlanChange::Price(v) => plan.price = v,
                    PlanChange::Period(v) => plan.period = v,
                    PlanChange::ButtonText(v) => plan.button_text = v,
                    PlanChange::Popular(v) => plan.is_popular = v,
                    PlanChange::Features(v) => plan.features = v,
                    PlanChange::FeaturesText(text) => plan.features = split_lines(&text),
                }
            }
            ContentEdit::AboutTitle(v) => content.about.section_title = v,
            ContentEdit::Reason {
                index,
                field,
                value,
            } => {
                let item = item_at(&mut content.about.items, "about", index)?;
                set_item_field(item, field, value);
            }
            ContentEdit::Cta(field, v) => {
                let cta = &mut content.cta;
                match field {
                    CtaField::Title => cta.title = v,
                    CtaField::Text => cta.text = v,
                    CtaField::ButtonText => cta.button_text = v,
                    CtaField::WhatsappNumber => cta.whatsapp_number = v,
                    CtaField::BackgroundImage => cta.background_image = v,
                }
            }
        }
        Ok(())
    }
}
