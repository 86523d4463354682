//! Page copy and site source loading.
//!
//! Stage 1 of the build. Reads the site source directory and produces a
//! [`Manifest`] that generation and the headless commands consume.
//!
//! ## Directory Structure
//!
//! ```text
//! site/
//! ├── config.toml      # Site configuration (optional, see `config`)
//! ├── content.toml     # Page copy overrides (optional)
//! └── assets/          # Files copied as-is to dist/assets/ (optional)
//! ```
//!
//! ## Stock Copy
//!
//! The full copy of all four pages ships inside the binary
//! (`static/content.toml`). A site's `content.toml` is merged over it with
//! [`config::merge_toml`]: tables merge key by key, arrays replace the stock
//! list whole. A site that only wants a different team writes:
//!
//! ```toml
//! [[contact.team]]
//! name = "Ana Silva"
//! role = "Founder"
//! image = "assets/ana.jpg"
//! description = "Runs the studio."
//! ```
//!
//! ## Validation
//!
//! Every record is display-only data. The one rule enforced at load time is
//! that no text field is blank; the error names the offending field
//! (`contact.team[0].role`). Lists may be empty: the page simply renders no
//! cards for them.

use crate::config::{self, SiteConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const STOCK_CONTENT: &str = include_str!("../static/content.toml");

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Content parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Content field must not be empty: {0}")]
    EmptyField(String),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Everything loaded from a site source directory.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub source: PathBuf,
    pub config: SiteConfig,
    pub content: Content,
    /// Files under `assets/`, relative to it, `/`-separated, sorted.
    pub assets: Vec<String>,
}

// =============================================================================
// Records
// =============================================================================

/// All copy of the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Content {
    pub home: HomePage,
    pub contact: ContactPage,
    pub terms: PolicyPage,
    pub privacy: PolicyPage,
    /// Footer "Connect" links.
    pub social: Vec<SocialLink>,
}

/// Section heading rendered as `title <highlight>` with an intro line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Heading {
    pub title: String,
    /// Gradient-styled tail of the heading.
    pub highlight: String,
    pub intro: String,
}

/// A heading with a call-to-action button.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Banner {
    pub title: String,
    pub highlight: String,
    pub intro: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomePage {
    pub hero: Banner,
    pub projects_heading: Heading,
    pub projects: Vec<Project>,
    pub services_heading: Heading,
    pub services: Vec<Service>,
    pub testimonials_heading: Heading,
    pub testimonials: Vec<Testimonial>,
    pub clients: Clients,
    pub cta: Banner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub image: String,
    pub tags: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Clients {
    pub title: String,
    pub logos: Vec<ClientLogo>,
}

/// A client shown as a monogram tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientLogo {
    pub name: String,
    pub logo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactPage {
    pub header: Heading,
    pub stats: Vec<Stat>,
    pub values_heading: Heading,
    pub values: Vec<Value>,
    pub mission: Mission,
    pub team_heading: Heading,
    pub team: Vec<TeamMember>,
    pub touch_heading: Heading,
    pub form: FormCopy,
    pub info: Vec<ContactInfo>,
    pub office_hours: Vec<OfficeHours>,
    pub response_time: TitledText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub icon: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Value {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mission {
    pub title: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub image: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormCopy {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactInfo {
    pub icon: String,
    pub title: String,
    pub content: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfficeHours {
    pub days: String,
    pub hours: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitledText {
    pub title: String,
    pub body: String,
}

/// Terms or privacy page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyPage {
    pub last_updated: String,
    pub header: Heading,
    pub highlights_heading: Heading,
    /// Key highlights (terms) or principles (privacy).
    pub highlights: Vec<Highlight>,
    pub overview: TitledText,
    pub sections: Vec<PolicySection>,
    pub closing: Closing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Highlight {
    pub icon: String,
    pub title: String,
    pub description: String,
}

/// Privacy principles share the highlight card layout.
pub type Principle = Highlight;

/// A numbered policy section. `body` is markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Closing {
    pub title: String,
    pub body: String,
    /// Extra contact lines shown under the body.
    pub details: Vec<String>,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub name: String,
    pub href: String,
}

// =============================================================================
// Loading
// =============================================================================

/// The embedded stock copy as a raw TOML value.
pub fn stock_content_value() -> Result<toml::Value, ContentError> {
    Ok(toml::from_str(STOCK_CONTENT)?)
}

/// The embedded stock copy.
pub fn stock_content() -> Result<Content, ContentError> {
    resolve_content(stock_content_value()?, None)
}

/// Merge an optional overlay onto the stock copy, reject blank text fields,
/// then deserialize.
pub fn resolve_content(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Content, ContentError> {
    let merged = match overlay {
        Some(ov) => config::merge_toml(base, ov),
        None => base,
    };
    if let Some(field) = first_blank_field(&merged, "") {
        return Err(ContentError::EmptyField(field));
    }
    Ok(merged.try_into()?)
}

/// Load `content.toml` from `root` merged over the stock copy.
pub fn load_content(root: &Path) -> Result<Content, ContentError> {
    let overlay = config::load_raw_toml(root, "content.toml").map_err(|e| match e {
        config::ConfigError::Io(io) => ContentError::Io(io),
        config::ConfigError::Toml(toml) => ContentError::Toml(toml),
        other => ContentError::Config(other),
    })?;
    resolve_content(stock_content_value()?, overlay)
}

/// Load config, content and the asset inventory from a site source directory.
///
/// A missing directory is not an error: the stock site is built.
pub fn load(root: &Path) -> Result<Manifest, ContentError> {
    let config = config::load_config(root)?;
    let content = load_content(root)?;
    let assets = list_assets(&root.join("assets"))?;
    tracing::debug!(
        source = %root.display(),
        assets = assets.len(),
        "site source loaded"
    );
    Ok(Manifest {
        source: root.to_path_buf(),
        config,
        content,
        assets,
    })
}

fn list_assets(dir: &Path) -> Result<Vec<String>, ContentError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut assets = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if name.starts_with('.') || name.contains("/.") {
            continue;
        }
        assets.push(name);
    }
    Ok(assets)
}

/// Path of the first blank string in `value`, depth first in key order.
fn first_blank_field(value: &toml::Value, path: &str) -> Option<String> {
    match value {
        toml::Value::String(s) if s.trim().is_empty() => Some(path.to_string()),
        toml::Value::Table(table) => table.iter().find_map(|(key, v)| {
            let child = if path.is_empty() {
                key.clone()
            } else {
                format!("{path}.{key}")
            };
            first_blank_field(v, &child)
        }),
        toml::Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, v)| first_blank_field(v, &format!("{path}[{i}]"))),
        _ => None,
    }
}

impl Content {
    /// Total number of display records, for the `check` inventory.
    pub fn record_count(&self) -> usize {
        let home = &self.home;
        let contact = &self.contact;
        home.projects.len()
            + home.services.len()
            + home.testimonials.len()
            + home.clients.logos.len()
            + contact.stats.len()
            + contact.values.len()
            + contact.team.len()
            + contact.info.len()
            + contact.office_hours.len()
            + self.terms.highlights.len()
            + self.terms.sections.len()
            + self.privacy.highlights.len()
            + self.privacy.sections.len()
            + self.social.len()
    }
}
