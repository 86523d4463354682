//! Page composition.
//!
//! [`Site`] is the composition root: it holds the loaded copy, the config,
//! the delivery collaborator and the host capabilities, and assembles them
//! into a [`MountedPage`] for one route. A mounted page owns its animation
//! [`Director`], its header state and, on `/contact`, its [`ContactForm`].
//! Unmounting (or dropping) the page tears all of them down synchronously,
//! so nothing from one page outlives a navigation.
//!
//! [`Site::layout`] describes each page as nominal section heights and motion
//! group sizes, derived from how many records the copy holds. The
//! `rehearse` command scrolls that layout top to bottom to show when every
//! entrance fires.

use crate::config::{ContactConfig, DeliveryKind, MotionConfig, SiteConfig};
use crate::content::Content;
use crate::delivery::{Deliver, SimulatedDelivery};
use crate::director::{Director, MotionEvent, PageLayout, Surface};
use crate::motion::{Capabilities, Plan, Repeat, plan_for};
use crate::submit::ContactForm;
use crate::types::Route;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::{Instant, sleep};

/// Scroll offset past which the header switches to its solid style.
pub const HEADER_SCROLL_THRESHOLD: f64 = 50.0;

/// Mobile menu and scroll styling of the shared header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderState {
    pub menu_open: bool,
    pub scrolled: bool,
}

impl HeaderState {
    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.scrolled = scroll_y > HEADER_SCROLL_THRESHOLD;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Follow a navigation link. Always closes the mobile menu; returns the
    /// target route when the path is one of the site's pages.
    pub fn navigate(&mut self, path: &str) -> Option<Route> {
        self.menu_open = false;
        Route::from_path(path)
    }
}

/// Build the delivery collaborator the config asks for.
pub fn delivery_from_config(contact: &ContactConfig) -> SimulatedDelivery {
    match contact.delivery {
        DeliveryKind::Simulated => SimulatedDelivery::new(contact.delivery_delay()),
    }
}

/// Motion groups of a page and how many elements each holds, in plan order.
pub fn motion_groups(route: Route, content: &Content) -> Vec<(&'static str, usize)> {
    match route {
        Route::Home => {
            let home = &content.home;
            vec![
                ("hero-title", 1),
                ("hero-subtitle", 1),
                ("hero-cta", 1),
                ("project-card", home.projects.len()),
                ("service-card", home.services.len()),
                ("testimonial-card", home.testimonials.len()),
                ("cta-content", 1),
                ("hero-float-1", 1),
                ("hero-float-2", 1),
            ]
        }
        Route::Contact => {
            let contact = &content.contact;
            vec![
                ("contact-header", 1),
                ("stat-card", contact.stats.len()),
                ("value-card", contact.values.len()),
                ("team-card", contact.team.len()),
                ("contact-form", 1),
                ("contact-info", 1),
            ]
        }
        // Overview and closing cards animate with the numbered sections.
        Route::Terms => vec![
            ("terms-header", 1),
            ("highlight-card", content.terms.highlights.len()),
            ("terms-card", content.terms.sections.len() + 2),
        ],
        Route::Privacy => vec![
            ("privacy-header", 1),
            ("principle-card", content.privacy.highlights.len()),
            ("privacy-section", content.privacy.sections.len() + 2),
        ],
    }
}

fn rows(items: usize, per_row: usize) -> f64 {
    items.div_ceil(per_row) as f64
}

const SECTION_CHROME: f64 = 320.0;
const FOOTER_HEIGHT: f64 = 400.0;

/// Rehearsal pacing.
#[derive(Debug, Clone)]
pub struct RehearsalSettings {
    pub viewport_height: f64,
    pub scroll_step: f64,
    pub scroll_interval: Duration,
}

impl RehearsalSettings {
    pub fn from_config(motion: &MotionConfig) -> Self {
        Self {
            viewport_height: f64::from(motion.viewport_height),
            scroll_step: f64::from(motion.scroll_step),
            scroll_interval: motion.scroll_interval(),
        }
    }
}

/// Outcome of scrolling a page top to bottom.
#[derive(Debug)]
pub struct Rehearsal {
    pub route: Route,
    pub events: Vec<MotionEvent>,
    pub scroll_ticks: usize,
    pub page_height: f64,
    /// Time from mount to unmount.
    pub elapsed: Duration,
}

pub struct Site<D> {
    config: SiteConfig,
    content: Content,
    delivery: D,
    capabilities: Capabilities,
}

impl<D: Deliver + Clone + 'static> Site<D> {
    pub fn new(config: SiteConfig, content: Content, delivery: D, capabilities: Capabilities) -> Self {
        Self {
            config,
            content,
            delivery,
            capabilities,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The route's animation plan. Whether it runs is up to the
    /// capabilities the site was built with.
    pub fn plan(&self, route: Route) -> Plan {
        plan_for(route)
    }

    /// Nominal geometry of a page at the given viewport height.
    pub fn layout(&self, route: Route, viewport_height: f64) -> PageLayout {
        let c = &self.content;
        let layout = PageLayout::new(viewport_height);
        let layout = match route {
            Route::Home => layout
                .with_section("hero", viewport_height)
                .with_section("projects", SECTION_CHROME + rows(c.home.projects.len(), 2) * 520.0)
                .with_section("services", SECTION_CHROME + rows(c.home.services.len(), 4) * 360.0)
                .with_section(
                    "testimonials",
                    SECTION_CHROME + rows(c.home.testimonials.len(), 3) * 380.0 + 240.0,
                )
                .with_section("cta", 480.0),
            Route::Contact => layout
                .with_section("header", 480.0)
                .with_section(
                    "about",
                    SECTION_CHROME
                        + rows(c.contact.stats.len(), 4) * 200.0
                        + rows(c.contact.values.len(), 4) * 320.0
                        + 400.0,
                )
                .with_section("team", SECTION_CHROME + rows(c.contact.team.len(), 3) * 560.0)
                .with_section("contact", SECTION_CHROME + 900.0),
            Route::Terms => layout
                .with_section("header", 560.0)
                .with_section(
                    "highlights",
                    SECTION_CHROME + rows(c.terms.highlights.len(), 4) * 320.0,
                )
                .with_section("content", (c.terms.sections.len() + 2) as f64 * 360.0),
            Route::Privacy => layout
                .with_section("header", 560.0)
                .with_section(
                    "principles",
                    SECTION_CHROME + rows(c.privacy.highlights.len(), 4) * 320.0,
                )
                .with_section("content", (c.privacy.sections.len() + 2) as f64 * 360.0),
        };
        motion_groups(route, c)
            .into_iter()
            .fold(layout.with_section("footer", FOOTER_HEIGHT), |layout, (group, n)| {
                layout.with_group(group, n)
            })
    }

    /// Mount `route` against `surface`, reporting motion on `sink`.
    ///
    /// Must run inside a tokio runtime.
    pub fn mount(
        &self,
        route: Route,
        surface: &dyn Surface,
        sink: UnboundedSender<MotionEvent>,
    ) -> MountedPage<D> {
        let director = Director::mount(self.plan(route), surface, &self.capabilities, sink);
        let form = (route == Route::Contact).then(|| {
            ContactForm::with_success_display(
                self.delivery.clone(),
                self.config.contact.success_display(),
            )
        });
        tracing::debug!(route = %route, "page mounted");
        MountedPage {
            route,
            header: HeaderState::default(),
            director,
            form,
        }
    }

    /// Mount `route` on its nominal layout, scroll to the bottom one tick at
    /// a time, wait for the last entrance to finish, then unmount.
    pub async fn rehearse(&self, route: Route, settings: &RehearsalSettings) -> Rehearsal {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut layout = self.layout(route, settings.viewport_height);
        let started = Instant::now();
        let mut page = self.mount(route, &layout, tx);

        let mut scroll_ticks = 0;
        while layout.scroll_y() < layout.max_scroll() {
            sleep(settings.scroll_interval).await;
            layout.scroll_to(layout.scroll_y() + settings.scroll_step);
            page.on_scroll(layout.scroll_y(), &layout);
            scroll_ticks += 1;
        }
        sleep(longest_entrance(page.director().plan(), &layout)).await;
        page.unmount();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        tracing::debug!(route = %route, events = events.len(), scroll_ticks, "rehearsal finished");
        Rehearsal {
            route,
            events,
            scroll_ticks,
            page_height: layout.total_height(),
            elapsed: started.elapsed(),
        }
    }
}

/// Time from firing to rest of the slowest one-shot step.
fn longest_entrance(plan: &[crate::motion::AnimationStep], surface: &dyn Surface) -> Duration {
    plan.iter()
        .filter(|step| step.repeat == Repeat::Once)
        .filter_map(|step| {
            let n = surface.group_len(&step.group);
            (n > 0).then(|| step.start_offset(n - 1) + step.duration)
        })
        .max()
        .unwrap_or(Duration::ZERO)
}

/// A page between mount and unmount.
pub struct MountedPage<D: Deliver + 'static> {
    route: Route,
    header: HeaderState,
    director: Director,
    form: Option<ContactForm<D>>,
}

impl<D: Deliver + 'static> MountedPage<D> {
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn header(&self) -> &HeaderState {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut HeaderState {
        &mut self.header
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    /// The contact form, on `/contact` only.
    pub fn form(&self) -> Option<&ContactForm<D>> {
        self.form.as_ref()
    }

    /// The page scrolled to `scroll_y`. Returns how many steps fired.
    pub fn on_scroll(&mut self, scroll_y: f64, surface: &dyn Surface) -> usize {
        self.header.on_scroll(scroll_y);
        self.director.on_scroll(surface)
    }

    /// Cancel every animation, observer and form timer of this page.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.director.dispose_all();
        if let Some(form) = &self.form {
            form.dispose();
        }
    }
}

impl<D: Deliver + 'static> Drop for MountedPage<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
