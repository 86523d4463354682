//! CLI output formatting for every command.
//!
//! Output leads with what the site *is*, not which files it touched: pages
//! by name with their content counts, motion by group, submissions by
//! field. File paths appear as secondary context after an arrow or on
//! indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 Home → /
//!     hero-title: 1
//!     project-card: 4 (on scroll into projects at 80%)
//!
//! Config
//!     Site: Portfolio
//!     Delivery: simulated, 2000ms, success shown 3000ms
//!     Motion: enabled
//!
//! Assets
//!     favicon.svg
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 Home → index.html (18.2 KB, 9 motion steps)
//! 002 About & Contact → contact/index.html (21.0 KB, 6 motion steps)
//!
//! Generated 4 pages, 2 assets in dist
//! ```
//!
//! ## Rehearse
//!
//! ```text
//! Home: 24 scroll ticks over 2880px, 3.84s
//!     0.000s  fired hero-title (1)
//!     1.440s  fired project-card (4)
//!     ...
//! Fired 9 of 9 steps, 0 settled, 6 yoyo turns
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::config::SiteConfig;
use crate::content::Manifest;
use crate::director::{MotionEvent, SettleReason};
use crate::generate::GenerateReport;
use crate::motion::{Trigger, plan_for};
use crate::site::{Rehearsal, motion_groups};
use crate::submit::{SUCCESS_MESSAGE, SubmitOutcome};
use crate::types::{NAVIGATION, Route};
use std::time::Duration;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display name of a route, as the navigation shows it.
fn route_name(route: Route) -> &'static str {
    NAVIGATION
        .iter()
        .find(|link| link.route == route)
        .map(|link| link.name)
        .unwrap_or("")
}

fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

fn format_secs(d: Duration) -> String {
    format!("{:.3}s", d.as_secs_f64())
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

// ============================================================================
// check
// ============================================================================

/// Inventory of the loaded site: pages with their motion groups, the
/// effective config, and the asset list.
pub fn format_check_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];

    for (i, route) in Route::ALL.into_iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            route_name(route),
            route.path()
        ));
        let plan = plan_for(route);
        for (group, count) in motion_groups(route, &manifest.content) {
            let trigger = plan
                .iter()
                .find(|step| step.group == group)
                .map(|step| &step.trigger);
            let detail = match trigger {
                Some(Trigger::OnScrollInto {
                    container,
                    threshold,
                }) => format!(
                    " (on scroll into {} at {:.0}%)",
                    container,
                    threshold * 100.0
                ),
                _ => String::new(),
            };
            lines.push(format!("{}{}: {}{}", indent(1), group, count, detail));
        }
    }

    lines.push(String::new());
    lines.extend(format_config_summary(&manifest.config));
    lines.push(format!(
        "{}Content: {} records",
        indent(1),
        manifest.content.record_count()
    ));

    lines.push(String::new());
    lines.push("Assets".to_string());
    if manifest.assets.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for asset in &manifest.assets {
        lines.push(format!("{}{}", indent(1), asset));
    }

    lines
}

fn format_config_summary(config: &SiteConfig) -> Vec<String> {
    vec![
        "Config".to_string(),
        format!("{}Site: {}", indent(1), config.site_name),
        format!(
            "{}Delivery: simulated, {}ms, success shown {}ms",
            indent(1),
            config.contact.delivery_delay_ms,
            config.contact.success_display_ms
        ),
        format!(
            "{}Motion: {}",
            indent(1),
            if config.motion.enabled {
                "enabled"
            } else {
                "disabled"
            }
        ),
    ]
}

pub fn print_check_output(manifest: &Manifest) {
    for line in format_check_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

pub fn format_build_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} → {} ({}, {})",
            format_index(i + 1),
            route_name(page.route),
            page.file.display(),
            format_bytes(page.bytes),
            plural(page.motion_steps, "motion step", "motion steps"),
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(report.pages.len(), "page", "pages"),
        plural(report.assets, "asset", "assets"),
        report.output_dir.display()
    ));
    lines
}

pub fn print_build_output(report: &GenerateReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// rehearse
// ============================================================================

/// One timeline line per step that fired or settled. Per-element events
/// are summarized in the footer.
pub fn format_rehearsal(rehearsal: &Rehearsal) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} over {:.0}px, {}",
        route_name(rehearsal.route),
        plural(rehearsal.scroll_ticks, "scroll tick", "scroll ticks"),
        rehearsal.page_height,
        format_secs(rehearsal.elapsed)
    )];

    let mut fired = 0;
    let mut settled = 0;
    let mut turns = 0;
    for event in &rehearsal.events {
        match event {
            MotionEvent::StepFired {
                group,
                elements,
                at,
                ..
            } => {
                fired += 1;
                lines.push(format!(
                    "{}{}  fired {} ({})",
                    indent(1),
                    format_secs(*at),
                    group,
                    elements
                ));
            }
            MotionEvent::Settled { group, reason, .. } => {
                settled += 1;
                let why = match reason {
                    SettleReason::MotionDisabled => "motion disabled",
                    SettleReason::NoViewport => "no viewport",
                    SettleReason::UnknownContainer => "container missing",
                };
                lines.push(format!("{}settled {} ({})", indent(1), group, why));
            }
            MotionEvent::YoyoTurned { .. } => turns += 1,
            MotionEvent::ElementStarted { .. } | MotionEvent::ElementFinished { .. } => {}
        }
    }

    let steps = plan_for(rehearsal.route).len();
    lines.push(format!(
        "Fired {} of {} steps, {} settled, {}",
        fired,
        steps,
        settled,
        plural(turns, "yoyo turn", "yoyo turns")
    ));
    lines
}

pub fn print_rehearsal(rehearsal: &Rehearsal) {
    for line in format_rehearsal(rehearsal) {
        println!("{}", line);
    }
}

// ============================================================================
// send
// ============================================================================

pub fn format_submit_outcome(outcome: &SubmitOutcome) -> Vec<String> {
    match outcome {
        SubmitOutcome::Delivered(receipt) => vec![
            SUCCESS_MESSAGE.to_string(),
            format!("{}Reference: {}", indent(1), receipt.reference),
        ],
        SubmitOutcome::Rejected(errors) => {
            let mut lines = vec![format!(
                "Not sent: {}",
                plural(errors.len(), "field needs attention", "fields need attention")
            )];
            for (field, message) in errors.iter() {
                lines.push(format!("{}{}: {}", indent(1), field.key(), message));
            }
            lines
        }
        SubmitOutcome::Failed(err) => vec![format!("Not sent: {}", err)],
        SubmitOutcome::Ignored => vec!["Not sent: a submission is already in flight".to_string()],
        SubmitOutcome::Cancelled => vec!["Not sent: cancelled".to_string()],
    }
}

pub fn print_submit_outcome(outcome: &SubmitOutcome) {
    for line in format_submit_outcome(outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{self, stock_content};
    use crate::delivery::{DeliveryError, Receipt};
    use crate::generate::GeneratedPage;
    use crate::test_helpers::setup_fixtures;
    use crate::validate::{FormRecord, validate};
    use std::path::PathBuf;

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(999), "999");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn bytes_switch_to_kilobytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
    }

    #[test]
    fn route_names_follow_navigation() {
        assert_eq!(route_name(Route::Contact), "About & Contact");
        assert_eq!(route_name(Route::Privacy), "Privacy Policy");
    }

    #[test]
    fn check_lists_pages_groups_and_assets() {
        let tmp = setup_fixtures();
        let manifest = content::load(tmp.path()).unwrap();
        let lines = format_check_output(&manifest);

        assert_eq!(lines[0], "Pages");
        assert_eq!(lines[1], "001 Home → /");
        assert!(lines.contains(&"    hero-title: 1".to_string()));
        assert!(lines.contains(&"    project-card: 4 (on scroll into projects at 80%)".to_string()));
        assert!(lines.contains(&"    value-card: 4 (on scroll into about at 60%)".to_string()));
        assert!(lines.contains(&"    team-card: 2 (on scroll into team at 70%)".to_string()));
        assert!(lines.contains(&"    Site: Northlight Studio".to_string()));
        assert!(lines.contains(&"    Delivery: simulated, 100ms, success shown 300ms".to_string()));
        assert_eq!(lines.last().unwrap(), "    img/team/ana.svg");
    }

    #[test]
    fn build_lists_pages_then_summary() {
        let report = GenerateReport {
            output_dir: PathBuf::from("dist"),
            pages: vec![GeneratedPage {
                route: Route::Terms,
                file: PathBuf::from("terms/index.html"),
                bytes: 3072,
                motion_steps: 1,
            }],
            assets: 0,
        };
        let lines = format_build_output(&report);
        assert_eq!(
            lines[0],
            "001 Terms & Conditions → terms/index.html (3.0 KB, 1 motion step)"
        );
        assert_eq!(lines[2], "Generated 1 page, 0 assets in dist");
    }

    #[test]
    fn rehearsal_shows_fired_and_settled_steps() {
        let rehearsal = Rehearsal {
            route: Route::Terms,
            events: vec![
                MotionEvent::StepFired {
                    step: 0,
                    group: "terms-header".into(),
                    elements: 1,
                    at: Duration::ZERO,
                },
                MotionEvent::ElementStarted {
                    step: 0,
                    element: 0,
                    at: Duration::ZERO,
                },
                MotionEvent::Settled {
                    step: 2,
                    group: "terms-card".into(),
                    reason: SettleReason::UnknownContainer,
                },
            ],
            scroll_ticks: 3,
            page_height: 2400.0,
            elapsed: Duration::from_millis(1500),
        };
        let lines = format_rehearsal(&rehearsal);
        assert_eq!(lines[0], "Terms & Conditions: 3 scroll ticks over 2400px, 1.500s");
        assert_eq!(lines[1], "    0.000s  fired terms-header (1)");
        assert_eq!(lines[2], "    settled terms-card (container missing)");
        assert_eq!(lines[3], "Fired 1 of 3 steps, 1 settled, 0 yoyo turns");
    }

    #[test]
    fn rejected_outcome_lists_fields_in_form_order() {
        let result = validate(&FormRecord {
            email: "nope".into(),
            ..Default::default()
        });
        let lines = format_submit_outcome(&SubmitOutcome::Rejected(result));
        assert_eq!(lines[0], "Not sent: 4 fields need attention");
        assert_eq!(lines[1], "    name: Name is required");
        assert_eq!(lines[2], "    email: Invalid email address");
    }

    #[test]
    fn delivered_outcome_shows_message_and_reference() {
        let lines = format_submit_outcome(&SubmitOutcome::Delivered(Receipt {
            reference: "abc".into(),
        }));
        assert_eq!(lines, vec![SUCCESS_MESSAGE.to_string(), "    Reference: abc".to_string()]);
    }

    #[test]
    fn failed_outcome_shows_error() {
        let lines = format_submit_outcome(&SubmitOutcome::Failed(DeliveryError::Unavailable(
            "offline".into(),
        )));
        assert_eq!(lines, vec!["Not sent: delivery service unavailable: offline"]);
    }

    #[test]
    fn stock_content_check_has_every_page() {
        let manifest = Manifest {
            source: PathBuf::from("site"),
            config: SiteConfig::default(),
            content: stock_content().unwrap(),
            assets: Vec::new(),
        };
        let lines = format_check_output(&manifest);
        for (i, route) in Route::ALL.into_iter().enumerate() {
            assert!(lines.contains(&format!("{} {} → {}", format_index(i + 1), route_name(route), route.path())));
        }
        assert_eq!(lines.last().unwrap(), "    (none)");
    }
}
