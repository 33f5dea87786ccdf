//! Compiled-in content used when neither the remote provider nor the local
//! cache has anything, and after an explicit reset.

use super::{
    AboutBlock, CtaBlock, HeroBlock, PlansBlock, PricingPlan, Project, ProjectCategory,
    ProjectMedia, ServicesBlock, SiteContent, Socials, TextItem,
};

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

fn item(id: i64, title: &str, description: &str) -> TextItem {
    TextItem {
        id,
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn plan(
    id: i64,
    name: &str,
    price: &str,
    button_text: &str,
    is_popular: bool,
    features: &[&str],
) -> PricingPlan {
    PricingPlan {
        id,
        name: name.to_string(),
        price: price.to_string(),
        period: "/mes".to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        button_text: button_text.to_string(),
        is_popular,
    }
}

pub fn site_content() -> SiteContent {
    SiteContent {
        logo: String::new(),
        site_name: "Digital Agency".to_string(),
        admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        socials: Socials {
            facebook: "https://facebook.com".to_string(),
            instagram: "https://instagram.com".to_string(),
            twitter: String::new(),
            linkedin: "https://linkedin.com".to_string(),
            tiktok: String::new(),
        },
        hero: HeroBlock {
            title_part1: "Impulsa tu".to_string(),
            title_accent: "Negocio Online".to_string(),
            subtitle: "Estrategias Digitales que Funcionan. Transformamos tus ideas en soluciones digitales rentables y escalables.".to_string(),
            button_primary: "Conoce Nuestros Servicios".to_string(),
            button_secondary: "Ver Portafolio".to_string(),
            image: "https://images.unsplash.com/photo-1522071820081-009f0129c71c?auto=format&fit=crop&w=800&q=80".to_string(),
        },
        services: ServicesBlock {
            section_title: "Nuestros Servicios".to_string(),
            section_subtitle: "Soluciones a tu medida".to_string(),
            items: vec![
                item(1, "Manejo de Redes Sociales", "Gestión de contenido y estrategia para tus redes. Aumenta tu comunidad."),
                item(2, "Desarrollo Web", "Creación de sitios web modernos y funcionales. Tiendas online y landing pages."),
                item(3, "SEO & Analítica", "Optimización y análisis de resultados para posicionar tu marca."),
                item(4, "Software Empresarial", "Sistemas personalizados para automatizar procesos."),
            ],
        },
        plans: PlansBlock {
            section_title: "Planes de Inversión".to_string(),
            section_subtitle: "Escoge el nivel de crecimiento para tu marca".to_string(),
            items: vec![
                plan(1, "Básico", "$199", "Empezar ahora", false, &[
                    "Gestión de 1 Red Social",
                    "4 Posts Mensuales",
                    "Soporte Vía Email",
                    "Reporte Mensual",
                ]),
                plan(2, "Profesional", "$499", "Plan más elegido", true, &[
                    "Gestión de 3 Redes",
                    "12 Posts Mensuales",
                    "Atención Prioritaria",
                    "Análisis de Competencia",
                    "Diseño de Landing Page",
                ]),
                plan(3, "Elite", "$999", "Contactar para detalles", false, &[
                    "Redes Ilimitadas",
                    "Contenido Diario",
                    "Estrategia Ads Full",
                    "Software a Medida",
                    "Consultoría 1 a 1",
                ]),
            ],
        },
        about: AboutBlock {
            section_title: "¿Por Qué Elegirnos?".to_string(),
            items: vec![
                item(1, "Experiencia Profesional", "Años de experiencia entregando resultados tangibles."),
                item(2, "Estrategias Efectivas", "Soluciones adaptadas específicamente a tu negocio."),
                item(3, "Atención Personalizada", "Comprometidos con tu éxito mediante un acompañamiento constante."),
            ],
        },
        cta: CtaBlock {
            title: "¿Listos para crecer tu negocio?".to_string(),
            text: "¡Hablemos hoy! Descubre cómo podemos llevar tu empresa al siguiente nivel.".to_string(),
            button_text: "Contáctanos".to_string(),
            whatsapp_number: "521234567890".to_string(),
            background_image: "https://images.unsplash.com/photo-1557804506-669a67965ba0?auto=format&fit=crop&w=1600&q=80".to_string(),
        },
    }
}

/// Default portfolio, newest first.
pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: 1,
            title: "Fashion Film 2024".to_string(),
            category: ProjectCategory::Redes,
            media: ProjectMedia::Video("https://www.youtube.com/embed/dQw4w9WgXcQ".to_string()),
            description: "Producción audiovisual completa para campaña de verano.".to_string(),
            tech: "Producción + Edición".to_string(),
        },
        Project {
            id: 2,
            title: "E-Commerce Moda Deluxe".to_string(),
            category: ProjectCategory::Web,
            media: ProjectMedia::Image("https://images.unsplash.com/photo-1483985988355-763728e1935b?auto=format&fit=crop&w=800&q=80".to_string()),
            description: "Tienda online completa con pasarela de pagos.".to_string(),
            tech: "React + Node.js".to_string(),
        },
    ]
}
