//! `config.toml`: site identity, contact timings, motion and colors.
//!
//! The stock defaults are a complete config; the site source directory's
//! `config.toml` is layered on top and the result validated once.
//!
//! ## Where It Lives
//!
//! ```text
//! site/
//! ├── config.toml              # Overrides stock defaults
//! ├── content.toml             # Page copy (see `content`)
//! └── assets/                  # Copied verbatim into the output
//! ```
//!
//! ## Keys and Defaults
//!
//! ```toml
//! # Every key is optional; these are the defaults
//!
//! site_name = "Portfolio"
//! tagline = "Crafting exceptional digital experiences with precision, passion, and purpose."
//! copyright_year = 2025
//!
//! [contact]
//! delivery = "simulated"      # Only simulated delivery ships
//! delivery_delay_ms = 2000    # How long the simulated delivery takes
//! success_display_ms = 3000   # How long the success message stays up
//!
//! [motion]
//! enabled = true              # false = every section renders at rest
//! viewport_height = 800       # Viewport used by `folio rehearse`
//! scroll_step = 120           # Pixels per rehearsal scroll tick
//! scroll_interval_ms = 60     # Time between rehearsal scroll ticks
//!
//! [colors.light]
//! background = "#ffffff"
//! foreground = "#0a0a0a"
//! muted = "#6b7280"
//! primary = "#6d28d9"
//! accent = "#db2777"
//! border = "#e5e7eb"
//! card = "#f9fafb"
//!
//! [colors.dark]
//! background = "#09090b"
//! foreground = "#fafafa"
//! muted = "#a1a1aa"
//! primary = "#a78bfa"
//! accent = "#f472b6"
//! border = "#27272a"
//! card = "#18181b"
//! ```
//!
//! ## Sparse Files
//!
//! A file names only what differs from the stock site:
//!
//! ```toml
//! [contact]
//! success_display_ms = 5000
//! ```
//!
//! A misspelled key is an error, not a silent default.

use crate::motion::Capabilities;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Effective site settings after merging `config.toml` over the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Brand shown in the header, footer and page titles.
    pub site_name: String,
    /// One-line description under the footer brand.
    pub tagline: String,
    pub copyright_year: u32,
    pub colors: ColorConfig,
    /// Contact form delivery and timing.
    pub contact: ContactConfig,
    /// Entrance animation settings.
    pub motion: MotionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Portfolio".to_string(),
            tagline: "Crafting exceptional digital experiences with precision, passion, and purpose."
                .to_string(),
            copyright_year: 2025,
            colors: ColorConfig::default(),
            contact: ContactConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Reject values no page can render with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Validation("site_name must not be empty".into()));
        }
        if self.contact.success_display_ms == 0 {
            return Err(ConfigError::Validation(
                "contact.success_display_ms must be greater than zero".into(),
            ));
        }
        if self.motion.viewport_height == 0 {
            return Err(ConfigError::Validation(
                "motion.viewport_height must be greater than zero".into(),
            ));
        }
        if self.motion.scroll_step == 0 {
            return Err(ConfigError::Validation(
                "motion.scroll_step must be greater than zero".into(),
            ));
        }
        for (mode, scheme) in [("light", &self.colors.light), ("dark", &self.colors.dark)] {
            if let Some(name) = scheme.first_blank() {
                return Err(ConfigError::Validation(format!(
                    "colors.{mode}.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// How validated contact submissions leave the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    /// Wait `delivery_delay_ms`, log the message, report success.
    #[default]
    Simulated,
}

/// Contact form settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub delivery: DeliveryKind,
    pub delivery_delay_ms: u64,
    /// How long "Message sent successfully!" stays visible.
    pub success_display_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryKind::Simulated,
            delivery_delay_ms: 2000,
            success_display_ms: 3000,
        }
    }
}

impl ContactConfig {
    pub fn delivery_delay(&self) -> Duration {
        Duration::from_millis(self.delivery_delay_ms)
    }

    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

/// Entrance animation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// When false, pages render every section at rest and no plan runs.
    pub enabled: bool,
    /// Viewport height (px) assumed by `folio rehearse`.
    pub viewport_height: u32,
    /// Pixels scrolled per rehearsal tick.
    pub scroll_step: u32,
    /// Time between rehearsal ticks.
    pub scroll_interval_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            viewport_height: 800,
            scroll_step: 120,
            scroll_interval_ms: 60,
        }
    }
}

impl MotionConfig {
    /// Host capabilities for a process with or without a viewport.
    pub fn capabilities(&self, has_viewport: bool) -> Capabilities {
        Capabilities {
            has_viewport,
            motion_enabled: self.enabled,
        }
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }
}

/// Palettes emitted as `--color-*` custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    /// Used for `prefers-color-scheme: dark` and the dark theme toggle.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// One palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub foreground: String,
    /// Secondary text (descriptions, captions, footer links).
    pub muted: String,
    /// Buttons, tags, gradient start.
    pub primary: String,
    /// Gradient end, decorative floats.
    pub accent: String,
    pub border: String,
    /// Card surfaces.
    pub card: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            foreground: "#0a0a0a".to_string(),
            muted: "#6b7280".to_string(),
            primary: "#6d28d9".to_string(),
            accent: "#db2777".to_string(),
            border: "#e5e7eb".to_string(),
            card: "#f9fafb".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#09090b".to_string(),
            foreground: "#fafafa".to_string(),
            muted: "#a1a1aa".to_string(),
            primary: "#a78bfa".to_string(),
            accent: "#f472b6".to_string(),
            border: "#27272a".to_string(),
            card: "#18181b".to_string(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("background", &self.background),
            ("foreground", &self.foreground),
            ("muted", &self.muted),
            ("primary", &self.primary),
            ("accent", &self.accent),
            ("border", &self.border),
            ("card", &self.card),
        ]
    }

    fn first_blank(&self) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }

    fn css_declarations(&self, indent: &str) -> String {
        self.entries()
            .into_iter()
            .map(|(name, value)| format!("{indent}--color-{name}: {value};\n"))
            .collect()
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Loading and layering
// =============================================================================

/// The defaults as a TOML table: the bottom layer every overlay merges onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Layer `overlay` onto `base`.
///
/// Tables merge key by key and keep base keys the overlay omits. Any other
/// overlay value, arrays included, replaces the base value whole. Content
/// lists (projects, team, sections) therefore replace the stock list.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `dir/file_name` as untyped TOML; `Ok(None)` when the file is absent.
pub fn load_raw_toml(dir: &Path, file_name: &str) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// [`load_raw_toml`] for `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    load_raw_toml(path, "config.toml")
}

/// Merge, deserialize, validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// The effective config for a site source directory. A missing
/// `config.toml` yields the defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Commented stock `config.toml`, printed by `folio gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# Every key is optional and shows its default. Delete what you don't change.
#
# Place this file next to content.toml in the site source directory.
# Misspelled keys are reported as errors.

# Brand shown in the header, footer and page titles.
site_name = "Portfolio"

# One-line description under the footer brand.
tagline = "Crafting exceptional digital experiences with precision, passion, and purpose."

copyright_year = 2025

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[contact]
# How submissions are delivered. Only "simulated" is available: it waits
# delivery_delay_ms, logs the message and reports success.
delivery = "simulated"
delivery_delay_ms = 2000

# How long the success message stays visible before the form resets.
success_display_ms = 3000

# ---------------------------------------------------------------------------
# Entrance animations
# ---------------------------------------------------------------------------
[motion]
# Set to false to render every section at rest.
enabled = true

# Viewport height (px) used by `folio rehearse`.
viewport_height = 800

# Rehearsal scroll speed: pixels per tick and time between ticks.
scroll_step = 120
scroll_interval_ms = 60

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
foreground = "#0a0a0a"
muted = "#6b7280"         # Descriptions, captions, footer links
primary = "#6d28d9"       # Buttons, tags, gradient start
accent = "#db2777"        # Gradient end, floating decorations
border = "#e5e7eb"
card = "#f9fafb"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark, or the theme toggle)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#09090b"
foreground = "#fafafa"
muted = "#a1a1aa"
primary = "#a78bfa"
accent = "#f472b6"
border = "#27272a"
card = "#18181b"
"##
}

/// `--color-*` custom properties for both palettes.
///
/// Dark colors apply when the visitor prefers a dark scheme and has not
/// chosen light with the theme toggle, or when they chose dark explicitly.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{light}}}\n\n\
         @media (prefers-color-scheme: dark) {{\n    :root:not([data-theme=\"light\"]) {{\n{dark_nested}    }}\n}}\n\n\
         :root[data-theme=\"dark\"] {{\n{dark}}}",
        light = colors.light.css_declarations("    "),
        dark_nested = colors.dark.css_declarations("        "),
        dark = colors.dark.css_declarations("    "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_palettes_differ_by_mode() {
        let config = SiteConfig::default();
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.colors.dark.background, "#09090b");
    }

    #[test]
    fn default_config_has_contact_timing() {
        let config = SiteConfig::default();
        assert_eq!(config.contact.delivery, DeliveryKind::Simulated);
        assert_eq!(config.contact.delivery_delay(), Duration::from_secs(2));
        assert_eq!(config.contact.success_display(), Duration::from_secs(3));
    }

    #[test]
    fn default_config_has_motion_settings() {
        let config = SiteConfig::default();
        assert!(config.motion.enabled);
        assert_eq!(config.motion.viewport_height, 800);
        assert_eq!(config.motion.scroll_interval(), Duration::from_millis(60));
        assert_eq!(
            config.motion.capabilities(false),
            Capabilities {
                has_viewport: false,
                motion_enabled: true
            }
        );
    }

    #[test]
    fn sparse_color_override_keeps_other_defaults() {
        let toml = r##"
[colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.light.background, "#fafafa");
        assert_eq!(config.colors.light.foreground, "#0a0a0a");
        assert_eq!(config.colors.dark.background, "#09090b");
        assert_eq!(config.contact.success_display_ms, 3000);
    }

    #[test]
    fn parse_contact_and_motion() {
        let toml = r##"
site_name = "Studio"

[contact]
delivery_delay_ms = 50

[motion]
enabled = false
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site_name, "Studio");
        assert_eq!(config.contact.delivery_delay_ms, 50);
        assert_eq!(config.contact.success_display_ms, 3000);
        assert!(!config.motion.enabled);
        assert_eq!(config.motion.scroll_step, 120);
    }

    #[test]
    fn unsupported_delivery_kind_rejected() {
        let toml = r#"
[contact]
delivery = "smtp"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn missing_config_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site_name, "Portfolio");
        assert_eq!(config.colors.light.background, "#ffffff");
    }

    #[test]
    fn config_file_layers_over_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
copyright_year = 2026

[colors.dark]
primary = "#88f"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.copyright_year, 2026);
        assert_eq!(config.colors.dark.primary, "#88f");
        assert_eq!(config.colors.dark.background, "#09090b");
    }

    #[test]
    fn malformed_config_file_is_toml_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[contact\ndelay = ").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_viewport_fails_validation() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[motion]\nviewport_height = 0\n",
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn absent_raw_config_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn load_raw_toml_reads_named_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("content.toml"), "[home]\n").unwrap();
        let value = load_raw_toml(tmp.path(), "content.toml").unwrap().unwrap();
        assert!(value.get("home").is_some());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn defaults_are_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_site_name() {
        let mut config = SiteConfig::default();
        config.site_name = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_success_display() {
        let mut config = SiteConfig::default();
        config.contact.success_display_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("success_display_ms"));
    }

    #[test]
    fn validate_names_blank_color() {
        let mut config = SiteConfig::default();
        config.colors.dark.accent = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("colors.dark.accent"));
    }

    #[test]
    fn misspelled_top_level_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("sitename = \"typo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn misspelled_motion_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[motion]\nspeed = 2\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn overlay_scalar_wins() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn overlay_merges_nested_palette() {
        let base: toml::Value =
            toml::from_str("[colors.light]\nbackground = \"#fff\"\nforeground = \"#000\"").unwrap();
        let overlay: toml::Value = toml::from_str("[colors.light]\nbackground = \"#eee\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["colors"]["light"]["background"].as_str(), Some("#eee"));
        assert_eq!(merged["colors"]["light"]["foreground"].as_str(), Some("#000"));
    }

    #[test]
    fn overlay_list_replaces_base_list() {
        let base: toml::Value = toml::from_str("items = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("items = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn resolve_keeps_unmentioned_contact_timing() {
        let overlay: toml::Value = toml::from_str("[contact]\ndelivery_delay_ms = 10").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.contact.delivery_delay_ms, 10);
        assert_eq!(config.contact.success_display_ms, 3000);
    }

    // =========================================================================
    // Stock config and CSS
    // =========================================================================

    #[test]
    fn printed_stock_config_matches_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site_name, defaults.site_name);
        assert_eq!(config.tagline, defaults.tagline);
        assert_eq!(config.contact.delivery_delay_ms, defaults.contact.delivery_delay_ms);
        assert_eq!(config.motion.scroll_step, defaults.motion.scroll_step);
        assert_eq!(config.colors.dark.card, defaults.colors.dark.card);
        assert_eq!(config.colors.light.primary, defaults.colors.light.primary);
    }

    #[test]
    fn defaults_table_has_every_section() {
        let value = stock_defaults_value();
        for key in ["site_name", "colors", "contact", "motion"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn color_css_declares_every_variable() {
        let css = generate_color_css(&ColorConfig::default());
        for name in ["background", "foreground", "muted", "primary", "accent", "border", "card"] {
            assert!(css.contains(&format!("--color-{name}:")), "missing {name}");
        }
    }

    #[test]
    fn generate_css_honours_theme_toggle() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains(":root:not([data-theme=\"light\"])"));
        assert!(css.contains(":root[data-theme=\"dark\"]"));
        assert!(css.contains("--color-background: #09090b;"));
    }
}
