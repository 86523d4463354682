//! # Folio
//!
//! A four-page marketing and portfolio site: Home, About & Contact, Terms &
//! Conditions, and Privacy Policy. The copy ships with the binary; a site
//! source directory only overrides what it names.
//!
//! Two behaviors make the site more than static text, and both live here as
//! plain Rust so they can be driven and tested without a browser:
//!
//! - the **contact form**: field validation, then a submission lifecycle
//!   `Idle → Submitting → Succeeded → Idle` against a pluggable delivery
//!   collaborator, with duplicate submits ignored while one is in flight;
//! - **entrance motion**: per-page animation plans with immediate and
//!   scroll-triggered steps, stagger, and endless yoyo floats, all torn down
//!   together when a page unmounts.
//!
//! # Architecture
//!
//! ```text
//! site/ (config.toml, content.toml, assets/)
//!    │  content::load
//!    ▼
//! Manifest ──► generate ──► dist/ (four pages + assets, plan JSON, scripts)
//!    │
//!    └──► site::Site ──► mount(route) ──► Director (motion)
//!                                     └─► ContactForm (submission)
//! ```
//!
//! The generated pages embed each route's plan and replay it in the browser
//! with the same firing rules the [`director`] applies headlessly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`validate`] | Contact field rules and the email pattern |
//! | [`delivery`] | `Deliver` trait and the simulated delivery |
//! | [`submit`] | Contact form submission lifecycle |
//! | [`motion`] | Animation steps, per-route plans, process-wide capabilities |
//! | [`director`] | Runs a plan against a surface; scroll observers and teardown |
//! | [`site`] | Composition root: routes, header state, mounting, rehearsal |
//! | [`content`] | Page copy: stock content merged with `content.toml`, assets |
//! | [`config`] | `config.toml` loading, validation, merging, color CSS |
//! | [`generate`] | Renders the four pages with Maud |
//! | [`types`] | Routes and navigation links |
//! | [`naming`] | `N. Title` section parsing and anchor slugs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Teardown Per Page
//!
//! Every timer, tween and scroll observer a page starts is owned by that
//! page's [`director::Director`] (and its [`submit::ContactForm`]). Unmounting
//! cancels them all at once; nothing fires after a page is gone.
//!
//! ## Delivery Is Injected
//!
//! The form awaits whatever [`delivery::Deliver`] it was built with. The site
//! ships only a simulated delivery; tests script successes, failures and
//! delays.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a compile error, interpolation is escaped by default, and there is no
//! template directory to ship.

pub mod config;
pub mod content;
pub mod delivery;
pub mod director;
pub mod generate;
pub mod motion;
pub mod naming;
pub mod output;
pub mod site;
pub mod submit;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
