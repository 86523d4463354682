//! Headless execution of a page's animation plan.
//!
//! A [`Director`] is created per page mount. It records every tween task and
//! scroll observer it starts, and [`Director::dispose_all`] (also run on
//! `Drop`) tears all of them down at once: after disposal no
//! [`MotionEvent`] is ever emitted again.
//!
//! The director never touches a DOM. It sees the page through the
//! [`Surface`] trait (how many elements a group has, where a container's top
//! edge is, how tall the viewport is) and reports what it animates as
//! [`MotionEvent`]s on an unbounded channel. Timing uses tokio timers, so a
//! paused clock makes every timeline exactly reproducible.
//!
//! ## Firing rules
//!
//! - Immediate steps fire during [`Director::mount`], in plan order.
//! - Scroll steps fire once, the first time `container_top <= threshold *
//!   viewport_height`, checked at mount and on every [`Director::on_scroll`].
//!   They never re-fire and never reverse.
//! - Steps that fire on the same update emit [`MotionEvent::StepFired`]
//!   synchronously in plan order.
//! - Element `i` of a fired step starts `delay + i * stagger` after firing.
//! - A group with no elements is a silent no-op.
//! - When a step cannot be animated (motion disabled, no viewport, unknown
//!   container) it settles immediately: the content is shown at rest.

use crate::motion::{AnimationStep, Capabilities, Plan, Repeat, Trigger};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

const THRESHOLD_EPSILON: f64 = 1e-9;

/// The director's view of a rendered page.
pub trait Surface {
    /// Number of elements tagged with `group`, in document order.
    fn group_len(&self, group: &str) -> usize;
    /// Top edge of `container` relative to the viewport top, in px.
    /// `None` when the container is not on the page.
    fn container_top(&self, container: &str) -> Option<f64>;
    fn viewport_height(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleReason {
    MotionDisabled,
    NoViewport,
    UnknownContainer,
}

/// Something the director did, stamped with the time since mount.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionEvent {
    StepFired {
        step: usize,
        group: String,
        elements: usize,
        at: Duration,
    },
    ElementStarted {
        step: usize,
        element: usize,
        at: Duration,
    },
    ElementFinished {
        step: usize,
        element: usize,
        at: Duration,
    },
    /// A yoyo element reached one end of its oscillation.
    YoyoTurned {
        step: usize,
        element: usize,
        cycle: u64,
        at: Duration,
    },
    Settled {
        step: usize,
        group: String,
        reason: SettleReason,
    },
}

impl MotionEvent {
    pub fn step(&self) -> usize {
        match self {
            MotionEvent::StepFired { step, .. }
            | MotionEvent::ElementStarted { step, .. }
            | MotionEvent::ElementFinished { step, .. }
            | MotionEvent::YoyoTurned { step, .. }
            | MotionEvent::Settled { step, .. } => *step,
        }
    }
}

struct Observer {
    step: usize,
    container: String,
    threshold: f64,
}

/// Per-mount registry of everything a page's plan has started.
pub struct Director {
    plan: Plan,
    observers: Vec<Observer>,
    tasks: JoinSet<()>,
    cancel: CancellationToken,
    sink: UnboundedSender<MotionEvent>,
    mounted_at: Instant,
    disposed: bool,
}

impl Director {
    /// Register `plan` against `surface`. Must run inside a tokio runtime.
    pub fn mount(
        plan: Plan,
        surface: &dyn Surface,
        capabilities: &Capabilities,
        sink: UnboundedSender<MotionEvent>,
    ) -> Self {
        let mut director = Self {
            plan,
            observers: Vec::new(),
            tasks: JoinSet::new(),
            cancel: CancellationToken::new(),
            sink,
            mounted_at: Instant::now(),
            disposed: false,
        };

        for index in 0..director.plan.len() {
            if !capabilities.motion_enabled {
                director.settle(index, SettleReason::MotionDisabled);
                continue;
            }
            match director.plan[index].trigger.clone() {
                Trigger::Immediate => director.fire(index, surface),
                Trigger::OnScrollInto {
                    container,
                    threshold,
                } => {
                    if !capabilities.has_viewport {
                        director.settle(index, SettleReason::NoViewport);
                        continue;
                    }
                    match surface.container_top(&container) {
                        None => {
                            tracing::warn!(
                                container = %container,
                                group = %director.plan[index].group,
                                "scroll container missing; showing content without animation"
                            );
                            director.settle(index, SettleReason::UnknownContainer);
                        }
                        // Already in view on a page mounted mid-scroll.
                        Some(top) if crossed(top, threshold, surface.viewport_height()) => {
                            director.fire(index, surface)
                        }
                        Some(_) => director.observers.push(Observer {
                            step: index,
                            container,
                            threshold,
                        }),
                    }
                }
            }
        }
        director
    }

    /// Re-evaluate scroll observers after the page moved. Returns the number
    /// of steps that fired on this update.
    pub fn on_scroll(&mut self, surface: &dyn Surface) -> usize {
        if self.disposed {
            return 0;
        }
        let viewport = surface.viewport_height();
        let mut due = Vec::new();
        self.observers.retain(|observer| {
            let reached = surface
                .container_top(&observer.container)
                .is_some_and(|top| crossed(top, observer.threshold, viewport));
            if reached {
                due.push(observer.step);
            }
            !reached
        });
        for step in &due {
            self.fire(*step, surface);
        }
        due.len()
    }

    /// Scroll observers that have not fired yet.
    pub fn pending_observers(&self) -> usize {
        self.observers.len()
    }

    /// Tween tasks still registered (running or waiting).
    pub fn active_tweens(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn plan(&self) -> &[AnimationStep] {
        &self.plan
    }

    /// Cancel every pending and in-flight tween and drop all observers.
    pub fn dispose_all(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.cancel.cancel();
        self.tasks.abort_all();
        let observers = std::mem::take(&mut self.observers).len();
        tracing::debug!(observers, "motion director disposed");
    }

    fn settle(&self, step: usize, reason: SettleReason) {
        let _ = self.sink.send(MotionEvent::Settled {
            step,
            group: self.plan[step].group.clone(),
            reason,
        });
    }

    fn fire(&mut self, index: usize, surface: &dyn Surface) {
        let step = self.plan[index].clone();
        let elements = surface.group_len(&step.group);
        if elements == 0 {
            tracing::trace!(group = %step.group, "no elements for motion group");
            return;
        }

        let fired_at = Instant::now();
        let _ = self.sink.send(MotionEvent::StepFired {
            step: index,
            group: step.group.clone(),
            elements,
            at: fired_at - self.mounted_at,
        });

        match step.repeat {
            Repeat::Once => {
                let timeline = entrance_timeline(index, &step, elements);
                self.spawn(play(timeline, fired_at, self.mounted_at, self.sink.clone()));
            }
            Repeat::YoyoForever => {
                for element in 0..elements {
                    let start = fired_at + step.start_offset(element);
                    self.spawn(oscillate(
                        index,
                        element,
                        start,
                        step.duration,
                        self.mounted_at,
                        self.sink.clone(),
                    ));
                }
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let token = self.cancel.clone();
        self.tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = task => {}
            }
        });
    }
}

impl Drop for Director {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

/// Whether a container whose top edge sits at `top` has reached `threshold`
/// of the viewport.
fn crossed(top: f64, threshold: f64, viewport: f64) -> bool {
    top <= threshold * viewport + THRESHOLD_EPSILON
}

/// Scheduled event relative to the firing instant.
type Cue = (Duration, MotionEvent);

/// Start and finish cues for every element, ordered by time then document
/// order. The `at` fields are filled in when the cue plays.
fn entrance_timeline(index: usize, step: &AnimationStep, elements: usize) -> Vec<Cue> {
    let mut cues = Vec::with_capacity(elements * 2);
    for element in 0..elements {
        let start = step.start_offset(element);
        cues.push((
            start,
            MotionEvent::ElementStarted {
                step: index,
                element,
                at: Duration::ZERO,
            },
        ));
        cues.push((
            start + step.duration,
            MotionEvent::ElementFinished {
                step: index,
                element,
                at: Duration::ZERO,
            },
        ));
    }
    // Stable: equal times keep start-before-finish and document order.
    cues.sort_by_key(|(offset, _)| *offset);
    cues
}

async fn play(
    timeline: Vec<Cue>,
    fired_at: Instant,
    mounted_at: Instant,
    sink: UnboundedSender<MotionEvent>,
) {
    for (offset, mut event) in timeline {
        let due = fired_at + offset;
        sleep_until(due).await;
        match &mut event {
            MotionEvent::ElementStarted { at, .. } | MotionEvent::ElementFinished { at, .. } => {
                *at = due - mounted_at;
            }
            _ => {}
        }
        if sink.send(event).is_err() {
            return;
        }
    }
}

async fn oscillate(
    step: usize,
    element: usize,
    start: Instant,
    half_period: Duration,
    mounted_at: Instant,
    sink: UnboundedSender<MotionEvent>,
) {
    if half_period.is_zero() {
        return;
    }
    let mut cycle = 0u64;
    let mut due = start;
    loop {
        cycle += 1;
        due += half_period;
        sleep_until(due).await;
        let event = MotionEvent::YoyoTurned {
            step,
            element,
            cycle,
            at: due - mounted_at,
        };
        if sink.send(event).is_err() {
            return;
        }
    }
}

/// A page described by section heights and group sizes, scrolled to a
/// fixed position. Used for rehearsals and tests.
#[derive(Debug, Clone)]
pub struct PageLayout {
    viewport_height: f64,
    scroll_y: f64,
    sections: Vec<(String, f64)>,
    groups: HashMap<String, usize>,
}

impl PageLayout {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            scroll_y: 0.0,
            sections: Vec::new(),
            groups: HashMap::new(),
        }
    }

    /// Append a section below the previous ones.
    pub fn with_section(mut self, name: &str, height: f64) -> Self {
        self.sections.push((name.to_string(), height));
        self
    }

    pub fn with_group(mut self, name: &str, elements: usize) -> Self {
        self.groups.insert(name.to_string(), elements);
        self
    }

    /// Document offset of a section's top edge.
    pub fn section_offset(&self, name: &str) -> Option<f64> {
        let mut offset = 0.0;
        for (section, height) in &self.sections {
            if section == name {
                return Some(offset);
            }
            offset += height;
        }
        None
    }

    pub fn total_height(&self) -> f64 {
        self.sections.iter().map(|(_, h)| h).sum()
    }

    /// Furthest scroll position the page allows.
    pub fn max_scroll(&self) -> f64 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    /// Scroll so that `container`'s top sits exactly at `threshold` of the
    /// viewport. Returns false when the container is unknown or the page
    /// cannot scroll that far.
    pub fn scroll_container_to(&mut self, container: &str, threshold: f64) -> bool {
        let Some(offset) = self.section_offset(container) else {
            return false;
        };
        let target = offset - threshold * self.viewport_height;
        if target < 0.0 || target > self.max_scroll() {
            return false;
        }
        self.scroll_y = target;
        true
    }
}

impl Surface for PageLayout {
    fn group_len(&self, group: &str) -> usize {
        self.groups.get(group).copied().unwrap_or(0)
    }

    fn container_top(&self, container: &str) -> Option<f64> {
        self.section_offset(container).map(|offset| offset - self.scroll_y)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}
