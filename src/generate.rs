//! HTML site generation.
//!
//! Stage 2 of the build. Takes the loaded [`Manifest`] and writes the four
//! static pages plus the site's assets.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero, featured projects, services,
//!   testimonials with client logos, call to action
//! - **About & Contact** (`/contact/index.html`): stats, values, mission,
//!   team, contact form and contact details
//! - **Terms** (`/terms/index.html`) and **Privacy** (`/privacy/index.html`):
//!   highlight cards, overview, numbered markdown sections with a table of
//!   contents, closing card
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── contact/index.html
//! ├── terms/index.html
//! ├── privacy/index.html
//! └── assets/                    # Copied from site/assets/
//! ```
//!
//! ## Motion and Form Wiring
//!
//! Elements that animate carry `data-motion-group`; scroll containers carry
//! `data-motion-container`. Each page embeds its animation plan as JSON
//! (`#motion-plan`) for `static/motion.js`, which plays it with the same
//! firing rules as the headless director. The contact form carries the email
//! pattern and the delivery and success timings as data attributes for
//! `static/contact.js`. Without JavaScript every element is simply visible.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/site.js`: Header scroll style, mobile menu, theme toggle
//! - `static/motion.js`: Entrance animation player
//! - `static/contact.js`: Contact form validation and submission

use crate::config::{self, SiteConfig};
use crate::content::{Banner, Content, Heading, Highlight, Manifest, PolicyPage};
use crate::motion::{AnimationStep, Plan};
use crate::naming::parse_section_title;
use crate::submit::SUCCESS_MESSAGE;
use crate::types::{FOOTER_LEGAL, FOOTER_NAVIGATION, NAVIGATION, Route};
use crate::validate::{EMAIL_PATTERN, Field};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const SITE_JS: &str = include_str!("../static/site.js");
const MOTION_JS: &str = include_str!("../static/motion.js");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// One written page.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPage {
    pub route: Route,
    pub file: PathBuf,
    pub bytes: usize,
    pub motion_steps: usize,
}

/// What a build wrote.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
    pub assets: usize,
}

/// Step as the browser player reads it: the plan plus a CSS easing.
#[derive(Serialize)]
struct PlayerStep<'a> {
    #[serde(flatten)]
    step: &'a AnimationStep,
    easing: &'static str,
}

pub fn generate(manifest: &Manifest, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&manifest.config.colors),
        CSS_STATIC
    );

    fs::create_dir_all(output_dir)?;

    let mut pages = Vec::with_capacity(Route::ALL.len());
    for route in Route::ALL {
        let plan = crate::motion::plan_for(route);
        let page = render_page(route, &manifest.config, &manifest.content, &plan, &css)?;
        let html = page.into_string();

        let file = output_dir.join(route.output_file());
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, &html)?;
        tracing::info!(page = %route, file = %file.display(), "generated");
        pages.push(GeneratedPage {
            route,
            file: PathBuf::from(route.output_file()),
            bytes: html.len(),
            motion_steps: plan.len(),
        });
    }

    let assets = copy_assets(&manifest.source.join("assets"), &manifest.assets, output_dir)?;

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        pages,
        assets,
    })
}

fn copy_assets(src: &Path, assets: &[String], output_dir: &Path) -> std::io::Result<usize> {
    let dst = output_dir.join("assets");
    for asset in assets {
        let target = dst.join(asset);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src.join(asset), &target)?;
    }
    Ok(assets.len())
}

/// Render one page as a complete document.
pub fn render_page(
    route: Route,
    config: &SiteConfig,
    content: &Content,
    plan: &Plan,
    css: &str,
) -> Result<Markup, GenerateError> {
    let (title, main) = match route {
        Route::Home => (config.site_name.clone(), render_home(content)),
        Route::Contact => (
            format!("About & Contact | {}", config.site_name),
            render_contact(config, content),
        ),
        Route::Terms => (
            format!("Terms & Conditions | {}", config.site_name),
            render_policy(&content.terms, "terms", "highlights", "highlight-card", "terms-card"),
        ),
        Route::Privacy => (
            format!("Privacy Policy | {}", config.site_name),
            render_policy(
                &content.privacy,
                "privacy",
                "principles",
                "principle-card",
                "privacy-section",
            ),
        ),
    };

    let player: Vec<PlayerStep> = plan
        .iter()
        .map(|step| PlayerStep {
            step,
            easing: step.ease.css(),
        })
        .collect();
    // Keep `</script>` out of the inline JSON.
    let plan_json = serde_json::to_string(&player)?.replace('<', "\\u003c");
    let motion = config.motion.capabilities(true).motion_enabled;

    let body = html! {
        (site_header(config, route))
        main { (main) }
        (site_footer(config, content))
        script type="application/json" data-enabled=(motion) id="motion-plan" {
            (PreEscaped(plan_json))
        }
        script { (PreEscaped(SITE_JS)) }
        script { (PreEscaped(MOTION_JS)) }
        @if route == Route::Contact {
            script { (PreEscaped(CONTACT_JS)) }
        }
    };

    Ok(base_document(&title, css, route, body))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, route: Route, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body data-page=(route.slug()) {
                (content)
            }
        }
    }
}

fn theme_toggle() -> Markup {
    html! {
        button.theme-toggle type="button" aria-label="Toggle theme" data-theme-toggle {
            span.theme-icon aria-hidden="true" {}
        }
    }
}

/// Fixed header with desktop nav, mobile menu and theme toggle.
fn site_header(config: &SiteConfig, current: Route) -> Markup {
    html! {
        header.site-header data-header {
            div.container.header-bar {
                a.brand.text-gradient href="/" { (config.site_name) }
                nav.site-nav aria-label="Main" {
                    @for link in &NAVIGATION {
                        a href=(link.route.path())
                            aria-current=[(link.route == current).then_some("page")] {
                            (link.name)
                        }
                    }
                    (theme_toggle())
                }
                div.mobile-controls {
                    (theme_toggle())
                    button.menu-toggle type="button" aria-label="Menu" aria-expanded="false"
                        aria-controls="mobile-menu" data-menu-toggle {
                        span.menu-icon aria-hidden="true" {}
                    }
                }
            }
            nav.mobile-menu id="mobile-menu" hidden {
                @for link in &NAVIGATION {
                    a href=(link.route.path()) data-menu-link { (link.name) }
                }
            }
        }
    }
}

fn site_footer(config: &SiteConfig, content: &Content) -> Markup {
    html! {
        footer.site-footer {
            div.container.footer-grid {
                div {
                    h3.text-gradient { (config.site_name) }
                    p.muted { (config.tagline) }
                }
                div {
                    h4 { "Navigation" }
                    @for link in &FOOTER_NAVIGATION {
                        a.footer-link href=(link.route.path()) { (link.name) }
                    }
                }
                div {
                    h4 { "Legal" }
                    @for link in &FOOTER_LEGAL {
                        a.footer-link href=(link.route.path()) { (link.name) }
                    }
                }
                div {
                    h4 { "Connect" }
                    div.social {
                        @for social in &content.social {
                            a href=(social.href) aria-label=(social.name) { (social.name) }
                        }
                    }
                    (theme_toggle())
                }
            }
            div.container.footer-bottom {
                p.muted { "© " (config.copyright_year) " " (config.site_name) ". All rights reserved." }
                p.muted { "Made with ♥ and passion" }
            }
        }
    }
}

fn section_heading(heading: &Heading) -> Markup {
    html! {
        div.section-heading {
            h2 { (heading.title) " " span.text-gradient { (heading.highlight) } }
            p.lead { (heading.intro) }
        }
    }
}

/// Decorative glyph for an icon name; unknown names render nothing.
fn icon(name: &str) -> Markup {
    let glyph = match name {
        "code" => "</>",
        "palette" => "◐",
        "zap" => "⚡",
        "search" => "⌕",
        "users" => "👥",
        "award" => "🏆",
        "target" => "◎",
        "check-circle" => "✓",
        "globe" => "🌐",
        "clock" => "◷",
        "mail" => "✉",
        "phone" => "☎",
        "map-pin" => "⌖",
        "file-text" => "▤",
        "scale" => "⚖",
        "shield" => "⛨",
        "alert-triangle" => "⚠",
        "eye" => "◉",
        "lock" => "🔒",
        "database" => "⛁",
        "settings" => "⚙",
        "bell" => "🔔",
        _ => "",
    };
    html! {
        span.icon data-icon=(name) aria-hidden="true" { (glyph) }
    }
}

fn banner_text(banner: &Banner) -> Markup {
    html! {
        h2 { (banner.title) " " span.text-gradient { (banner.highlight) } }
        p.lead { (banner.intro) }
    }
}

fn markdown(source: &str) -> String {
    let parser = Parser::new(source);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(content: &Content) -> Markup {
    let home = &content.home;
    html! {
        section.hero.hero-gradient data-motion-container="hero" {
            div.container.hero-inner {
                div data-motion-group="hero-title" {
                    h1 { (home.hero.title) " " span.text-gradient { (home.hero.highlight) } }
                }
                p.lead data-motion-group="hero-subtitle" { (home.hero.intro) }
                div data-motion-group="hero-cta" {
                    a.button.button-lg href=(Route::Contact.path()) { (home.hero.action) " →" }
                }
            }
            div.hero-float.hero-float-1 data-motion-group="hero-float-1" aria-hidden="true" {}
            div.hero-float.hero-float-2 data-motion-group="hero-float-2" aria-hidden="true" {}
        }
        section.section-gradient data-motion-container="projects" {
            div.container {
                (section_heading(&home.projects_heading))
                div.grid.grid-2 {
                    @for project in &home.projects {
                        article.card.project-card data-motion-group="project-card" {
                            a.project-image href=(project.link) {
                                img src=(project.image) alt=(project.title) loading="lazy";
                            }
                            div.card-body {
                                h3 { (project.title) }
                                p.muted { (project.description) }
                                div.tags {
                                    @for tag in &project.tags {
                                        span.tag { (tag) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        section data-motion-container="services" {
            div.container {
                (section_heading(&home.services_heading))
                div.grid.grid-4 {
                    @for service in &home.services {
                        article.card.centered data-motion-group="service-card" {
                            (icon(&service.icon))
                            h3 { (service.title) }
                            p.muted { (service.description) }
                        }
                    }
                }
            }
        }
        section.section-gradient data-motion-container="testimonials" {
            div.container {
                (section_heading(&home.testimonials_heading))
                div.grid.grid-3 {
                    @for testimonial in &home.testimonials {
                        figure.card data-motion-group="testimonial-card" {
                            blockquote.muted { "\u{201c}" (testimonial.quote) "\u{201d}" }
                            figcaption.person {
                                img.avatar src=(testimonial.image) alt=(testimonial.author) loading="lazy";
                                span {
                                    strong { (testimonial.author) }
                                    small.muted { (testimonial.role) }
                                }
                            }
                        }
                    }
                }
                div.clients {
                    h3.muted { (home.clients.title) }
                    div.client-logos {
                        @for client in &home.clients.logos {
                            span.client-logo title=(client.name) { (client.logo) }
                        }
                    }
                }
            }
        }
        section data-motion-container="cta" {
            div.container.centered data-motion-group="cta-content" {
                (banner_text(&home.cta))
                div.actions {
                    a.button.button-lg href=(Route::Contact.path()) { (home.cta.action) " →" }
                    @if let Some(secondary) = &home.cta.secondary_action {
                        a.button.button-lg.button-outline href=(Route::Contact.path()) { (secondary) }
                    }
                }
            }
        }
    }
}

fn render_contact(config: &SiteConfig, content: &Content) -> Markup {
    let contact = &content.contact;
    html! {
        section.page-header.hero-gradient data-motion-container="header" {
            div.container.centered data-motion-group="contact-header" {
                h1 { (contact.header.title) " " span.text-gradient { (contact.header.highlight) } }
                p.lead { (contact.header.intro) }
            }
        }
        section.section-gradient data-motion-container="about" {
            div.container {
                div.grid.grid-4 {
                    @for stat in &contact.stats {
                        div.card.centered.stat data-motion-group="stat-card" {
                            (icon(&stat.icon))
                            strong.stat-value.text-gradient { (stat.value) }
                            span.muted { (stat.label) }
                        }
                    }
                }
                (section_heading(&contact.values_heading))
                div.grid.grid-4 {
                    @for value in &contact.values {
                        article.card.centered data-motion-group="value-card" {
                            (icon(&value.icon))
                            h3 { (value.title) }
                            p.muted { (value.description) }
                        }
                    }
                }
                div.card.mission {
                    h3.text-gradient { (contact.mission.title) }
                    @for paragraph in &contact.mission.paragraphs {
                        p.muted { (paragraph) }
                    }
                }
            }
        }
        section data-motion-container="team" {
            div.container {
                (section_heading(&contact.team_heading))
                div.grid.grid-3 {
                    @for member in &contact.team {
                        article.card.team-card data-motion-group="team-card" {
                            img src=(member.image) alt=(member.name) loading="lazy";
                            div.card-body.centered {
                                h3 { (member.name) }
                                p.role { (member.role) }
                                p.muted { (member.description) }
                            }
                        }
                    }
                }
            }
        }
        section.section-gradient data-motion-container="contact" {
            div.container {
                (section_heading(&contact.touch_heading))
                div.grid.grid-2 {
                    div.card data-motion-group="contact-form" {
                        h3 { (contact.form.title) }
                        (contact_form(config))
                    }
                    div.contact-details data-motion-group="contact-info" {
                        h3 { "Contact Information" }
                        @for info in &contact.info {
                            a.contact-item href=(info.href) {
                                (icon(&info.icon))
                                span {
                                    strong { (info.title) }
                                    span.muted { (info.content) }
                                }
                            }
                        }
                        h3 { "Office Hours" }
                        dl.office-hours {
                            @for hours in &contact.office_hours {
                                dt { (hours.days) ":" }
                                dd { (hours.hours) }
                            }
                        }
                        h3 { (contact.response_time.title) }
                        p.muted { (contact.response_time.body) }
                    }
                }
            }
        }
    }
}

/// The contact form. Validation and submission run in `contact.js`.
pub fn contact_form(config: &SiteConfig) -> Markup {
    html! {
        form.contact-form id="contact-form" novalidate
            data-email-pattern=(EMAIL_PATTERN)
            data-delivery-delay-ms=(config.contact.delivery_delay_ms)
            data-success-display-ms=(config.contact.success_display_ms) {
            div.field-row {
                @for field in [Field::Name, Field::Email] {
                    (form_field(field))
                }
            }
            (form_field(Field::Subject))
            (form_field(Field::Message))
            button.button.button-lg.button-block type="submit" data-submit {
                "Send Message"
            }
            p.form-success role="status" hidden { (SUCCESS_MESSAGE) }
            p.form-failure role="alert" hidden {}
        }
    }
}

fn form_field(field: Field) -> Markup {
    let id = format!("field-{}", field.key());
    html! {
        div.field {
            label.visually-hidden for=(id) { (field.label()) }
            @if field == Field::Message {
                textarea id=(id) name=(field.key()) rows="6" placeholder=(field.placeholder()) {}
            } @else {
                input id=(id) name=(field.key())
                    type=(if field == Field::Email { "email" } else { "text" })
                    placeholder=(field.placeholder());
            }
            p.field-error data-error-for=(field.key()) hidden {}
        }
    }
}

fn highlight_card(card: &Highlight, group: &str) -> Markup {
    html! {
        article.card.centered data-motion-group=(group) {
            (icon(&card.icon))
            h3 { (card.title) }
            p.muted { (card.description) }
        }
    }
}

/// Terms and privacy share one layout; only the motion names differ.
fn render_policy(
    page: &PolicyPage,
    slug: &str,
    highlights_container: &str,
    highlight_group: &str,
    section_group: &str,
) -> Markup {
    let titles: Vec<_> = page
        .sections
        .iter()
        .map(|s| parse_section_title(&s.title))
        .collect();
    html! {
        section.page-header.hero-gradient data-motion-container="header" {
            div.container.centered data-motion-group={ (slug) "-header" } {
                h1 { (page.header.title) " " span.text-gradient { (page.header.highlight) } }
                p.lead { (page.header.intro) }
                p.muted.updated { "Last updated: " (page.last_updated) }
            }
        }
        section.section-gradient data-motion-container=(highlights_container) {
            div.container {
                (section_heading(&page.highlights_heading))
                div.grid.grid-4 {
                    @for card in &page.highlights {
                        (highlight_card(card, highlight_group))
                    }
                }
            }
        }
        section data-motion-container="content" {
            div.container.narrow {
                article.card.policy-card data-motion-group=(section_group) {
                    h2.text-gradient { (page.overview.title) }
                    p.muted { (page.overview.body) }
                    @if !titles.is_empty() {
                        nav.policy-toc aria-label="Sections" {
                            ol {
                                @for title in &titles {
                                    li { a href={ "#" (title.slug) } { (title.title) } }
                                }
                            }
                        }
                    }
                }
                @for (section, title) in page.sections.iter().zip(&titles) {
                    article.card.policy-card id=(title.slug) data-motion-group=(section_group) {
                        h2.section-title {
                            @if let Some(n) = title.number {
                                span.section-number { (n) ". " }
                            }
                            (title.title)
                        }
                        div.policy-body.muted { (PreEscaped(markdown(&section.body))) }
                    }
                }
                hr;
                article.card.policy-card.closing data-motion-group=(section_group) {
                    h2 { (page.closing.title) }
                    p.muted { (page.closing.body) }
                    @if !page.closing.details.is_empty() {
                        ul.closing-details {
                            @for line in &page.closing.details {
                                li { (line) }
                            }
                        }
                    }
                    a.text-link href=(Route::Contact.path()) { (page.closing.action) }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
