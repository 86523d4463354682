//! Declarative entrance-animation plans.
//!
//! Each page owns a fixed, ordered list of [`AnimationStep`]s, built once at
//! composition time by [`plan_for`]. A step names a group of elements (the
//! `data-motion-group` tag in the markup), where they start from, how long
//! they take to come to rest, and what triggers them:
//!
//! - [`Trigger::Immediate`] — once, at mount (hero text).
//! - [`Trigger::OnScrollInto`] — once, the first time a named container's top
//!   edge reaches `threshold` of the viewport height (`0.8` = "top 80%").
//!
//! Two steps on the home page are [`Repeat::YoyoForever`]: floating
//! decorations that drift to the offset and back for as long as the page is
//! mounted.
//!
//! Plans are plain data. The [`director`](crate::director) executes them
//! headlessly; the generated pages embed them as JSON for the browser player.
//!
//! ## Process-wide installation
//!
//! Scroll observation needs a viewport. The composition root calls
//! [`install`] once at startup with the host's [`Capabilities`]; later calls
//! return the first installation unchanged.

use crate::types::Route;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Duration;

/// Easing curves used by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ease {
    #[serde(rename = "power3.out")]
    Power3Out,
    #[serde(rename = "power2.inOut")]
    Power2InOut,
    #[serde(rename = "linear")]
    Linear,
}

impl Ease {
    /// Progress at normalized time `t` (clamped to `0..=1`).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - 4.0 * (1.0 - t).powi(3)
                }
            }
            Ease::Linear => t,
        }
    }

    /// Closest CSS timing function, for the browser player.
    pub fn css(self) -> &'static str {
        match self {
            Ease::Power3Out => "cubic-bezier(0.165, 0.84, 0.44, 1)",
            Ease::Power2InOut => "cubic-bezier(0.645, 0.045, 0.355, 1)",
            Ease::Linear => "linear",
        }
    }
}

/// Translation applied at the start of an entrance (or the far end of a yoyo).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Offset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Offset {
    pub fn x(px: f64) -> Self {
        Self {
            x: Some(px),
            y: None,
        }
    }

    pub fn y(px: f64) -> Self {
        Self {
            x: None,
            y: Some(px),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    Immediate,
    OnScrollInto {
        container: String,
        /// Fraction of the viewport height measured from the top.
        threshold: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    Once,
    YoyoForever,
}

/// Visual state of one element at a point in its tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationStep {
    pub group: String,
    pub offset: Offset,
    /// Opacity at the start of the entrance; `1.0` for pure translations.
    pub opacity: f64,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    #[serde(serialize_with = "serialize_secs")]
    pub delay: Duration,
    #[serde(
        serialize_with = "serialize_opt_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub stagger: Option<Duration>,
    pub ease: Ease,
    pub trigger: Trigger,
    pub repeat: Repeat,
}

impl AnimationStep {
    /// Entrance from `offset` at zero opacity to the resting state.
    pub fn entrance(group: &str, offset: Offset, duration_ms: u64) -> Self {
        Self {
            group: group.to_string(),
            offset,
            opacity: 0.0,
            duration: Duration::from_millis(duration_ms),
            delay: Duration::ZERO,
            stagger: None,
            ease: Ease::Power3Out,
            trigger: Trigger::Immediate,
            repeat: Repeat::Once,
        }
    }

    /// Endless drift from rest to `offset` and back.
    pub fn float(group: &str, offset: Offset, duration_ms: u64) -> Self {
        Self {
            group: group.to_string(),
            offset,
            opacity: 1.0,
            duration: Duration::from_millis(duration_ms),
            delay: Duration::ZERO,
            stagger: None,
            ease: Ease::Power2InOut,
            trigger: Trigger::Immediate,
            repeat: Repeat::YoyoForever,
        }
    }

    pub fn delayed(mut self, delay_ms: u64) -> Self {
        self.delay = Duration::from_millis(delay_ms);
        self
    }

    pub fn staggered(mut self, stagger_ms: u64) -> Self {
        self.stagger = Some(Duration::from_millis(stagger_ms));
        self
    }

    pub fn on_scroll_into(mut self, container: &str, threshold: f64) -> Self {
        self.trigger = Trigger::OnScrollInto {
            container: container.to_string(),
            threshold,
        };
        self
    }

    /// Start time of element `index` relative to the moment the step fires.
    pub fn start_offset(&self, index: usize) -> Duration {
        let stagger = self.stagger.unwrap_or(Duration::ZERO);
        self.delay + stagger * index as u32
    }

    /// Sample the element's visual state `elapsed` after its own start.
    pub fn frame_at(&self, elapsed: Duration) -> Frame {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        let p = self.ease.apply(t);
        let x = self.offset.x.unwrap_or(0.0);
        let y = self.offset.y.unwrap_or(0.0);
        match self.repeat {
            // Entrances travel from the offset to rest.
            Repeat::Once => Frame {
                x: x * (1.0 - p),
                y: y * (1.0 - p),
                opacity: self.opacity + (1.0 - self.opacity) * p,
            },
            // Yoyo tweens travel from rest to the offset (reversed on odd cycles).
            Repeat::YoyoForever => Frame {
                x: x * p,
                y: y * p,
                opacity: 1.0,
            },
        }
    }

    pub fn is_scroll_triggered(&self) -> bool {
        matches!(self.trigger, Trigger::OnScrollInto { .. })
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

fn serialize_opt_secs<S: serde::Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_f64(d.as_secs_f64()),
        None => s.serialize_none(),
    }
}

/// Ordered steps for a page.
pub type Plan = Vec<AnimationStep>;

/// Scroll containers of each page, in document order.
pub fn containers_for(route: Route) -> &'static [&'static str] {
    match route {
        Route::Home => &["hero", "projects", "services", "testimonials", "cta"],
        Route::Contact => &["header", "about", "team", "contact"],
        Route::Terms => &["header", "highlights", "content"],
        Route::Privacy => &["header", "principles", "content"],
    }
}

/// The page's animation plan, in registration order.
pub fn plan_for(route: Route) -> Plan {
    match route {
        Route::Home => vec![
            AnimationStep::entrance("hero-title", Offset::y(100.0), 1200).delayed(200),
            AnimationStep::entrance("hero-subtitle", Offset::y(80.0), 1000).delayed(500),
            AnimationStep::entrance("hero-cta", Offset::y(60.0), 800).delayed(800),
            AnimationStep::entrance("project-card", Offset::y(100.0), 800)
                .staggered(200)
                .on_scroll_into("projects", 0.8),
            AnimationStep::entrance("service-card", Offset::y(80.0), 800)
                .staggered(150)
                .on_scroll_into("services", 0.8),
            AnimationStep::entrance("testimonial-card", Offset::y(80.0), 800)
                .staggered(200)
                .on_scroll_into("testimonials", 0.8),
            AnimationStep::entrance("cta-content", Offset::y(80.0), 1000)
                .on_scroll_into("cta", 0.8),
            AnimationStep::float("hero-float-1", Offset::y(-30.0), 3000),
            AnimationStep::float("hero-float-2", Offset::y(-20.0), 4000).delayed(1000),
        ],
        Route::Contact => vec![
            AnimationStep::entrance("contact-header", Offset::y(100.0), 1200),
            AnimationStep::entrance("stat-card", Offset::y(80.0), 800)
                .staggered(100)
                .on_scroll_into("about", 0.8),
            AnimationStep::entrance("value-card", Offset::y(80.0), 800)
                .staggered(150)
                .on_scroll_into("about", 0.6),
            AnimationStep::entrance("team-card", Offset::y(100.0), 800)
                .staggered(200)
                .on_scroll_into("team", 0.7),
            AnimationStep::entrance("contact-form", Offset::x(-80.0), 1000)
                .on_scroll_into("contact", 0.7),
            AnimationStep::entrance("contact-info", Offset::x(80.0), 1000)
                .on_scroll_into("contact", 0.7),
        ],
        Route::Terms => vec![
            AnimationStep::entrance("terms-header", Offset::y(100.0), 1200),
            AnimationStep::entrance("highlight-card", Offset::y(80.0), 800)
                .staggered(150)
                .on_scroll_into("highlights", 0.8),
            AnimationStep::entrance("terms-card", Offset::y(80.0), 800)
                .staggered(100)
                .on_scroll_into("content", 0.8),
        ],
        Route::Privacy => vec![
            AnimationStep::entrance("privacy-header", Offset::y(100.0), 1200),
            AnimationStep::entrance("principle-card", Offset::y(80.0), 800)
                .staggered(100)
                .on_scroll_into("principles", 0.8),
            AnimationStep::entrance("privacy-section", Offset::y(80.0), 800)
                .staggered(100)
                .on_scroll_into("content", 0.8),
        ],
    }
}

/// What the host environment can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// A viewport exists, so scroll positions can be observed.
    pub has_viewport: bool,
    /// Motion is wanted at all; when false every step settles at rest.
    pub motion_enabled: bool,
}

impl Capabilities {
    pub const HEADLESS: Capabilities = Capabilities {
        has_viewport: false,
        motion_enabled: true,
    };

    pub const BROWSER: Capabilities = Capabilities {
        has_viewport: true,
        motion_enabled: true,
    };
}

static INSTALLED: OnceLock<Capabilities> = OnceLock::new();

/// Register the host's capabilities once for the whole process.
pub fn install(capabilities: Capabilities) -> &'static Capabilities {
    let installed = INSTALLED.get_or_init(|| {
        tracing::debug!(?capabilities, "motion capabilities installed");
        capabilities
    });
    if *installed != capabilities {
        tracing::debug!(
            requested = ?capabilities,
            active = ?installed,
            "motion already installed; keeping the first installation"
        );
    }
    installed
}

/// The installed capabilities, if [`install`] has run.
pub fn installed() -> Option<&'static Capabilities> {
    INSTALLED.get()
}
