//! Content measurement: the probe that reports natural size after layout,
//! and the sheet-owned height state it feeds.
//!
//! The loop is explicit:
//!
//! ```text
//! layout pass ──> MeasureProbe::layout ──> observer(GeometryReport)
//!                                               │
//!                                               v
//!                       MeasuredHeight::report (compare, store)
//!                                               │ changed?
//!                                               v
//!                          HeightChange subscribers (relayout request)
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::{Canvas, KeyCode, MouseEvent, Region, Size, Widget};

/// A measurement produced by a [`MeasureProbe`] after laying out its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryReport {
    /// Presentation generation of the content that was measured.
    pub generation: u64,
    /// Natural size of the content at the laid-out width.
    pub size: Size,
}

/// Published when the stored height actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightChange {
    pub from: Option<u16>,
    pub to: u16,
    pub generation: u64,
}

type HeightObserver = Rc<dyn Fn(HeightChange)>;

#[derive(Default)]
struct HeightInner {
    height: Cell<Option<u16>>,
    generation: Cell<u64>,
    observers: RefCell<Vec<HeightObserver>>,
}

/// The last measured natural height of a sheet's content.
///
/// Starts unset. Only a report for the live generation can change it, so a
/// measurement from content that has already been replaced is dropped.
#[derive(Clone, Default)]
pub struct MeasuredHeight {
    inner: Rc<HeightInner>,
}

impl MeasuredHeight {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored height, or `None` before the first measurement.
    pub fn current(&self) -> Option<u16> {
        self.inner.height.get()
    }

    /// The stored height, zero before the first measurement.
    pub fn height(&self) -> u16 {
        self.current().unwrap_or(0)
    }

    /// Generation of the content currently allowed to report.
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// Start a new presentation. Reports tagged with older generations are
    /// ignored from now on. The stored height is kept.
    pub fn begin_generation(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }

    /// Apply a probe report.
    ///
    /// Returns the change if the stored height moved; equal or stale reports
    /// return `None` without touching any state.
    pub fn report(&self, report: GeometryReport) -> Option<HeightChange> {
        let live = self.generation();
        if report.generation != live {
            log::debug!(
                "dropping stale measurement {} from generation {} (live {})",
                report.size.height,
                report.generation,
                live
            );
            return None;
        }

        let from = self.current();
        if from == Some(report.size.height) {
            return None;
        }

        self.inner.height.set(Some(report.size.height));
        let change = HeightChange {
            from,
            to: report.size.height,
            generation: live,
        };
        log::debug!("content height {:?} -> {}", from, change.to);

        let observers: Vec<HeightObserver> = self.inner.observers.borrow().clone();
        for observer in observers {
            observer(change);
        }
        Some(change)
    }

    /// Register an observer called after every height change.
    pub fn subscribe(&self, observer: impl Fn(HeightChange) + 'static) {
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }
}

impl fmt::Debug for MeasuredHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasuredHeight")
            .field("height", &self.current())
            .field("generation", &self.generation())
            .finish()
    }
}

/// Invisible wrapper that measures its child after every layout pass.
///
/// The probe lays the child out at the width it is given and at the child's
/// natural height, then hands a [`GeometryReport`] to its observer. It draws
/// nothing of its own.
pub struct MeasureProbe<M> {
    child: Box<dyn Widget<M>>,
    generation: u64,
    observer: Option<Rc<dyn Fn(GeometryReport)>>,
    last_report: Option<GeometryReport>,
}

impl<M> MeasureProbe<M> {
    pub fn new(child: Box<dyn Widget<M>>) -> Self {
        Self {
            child,
            generation: 0,
            observer: None,
            last_report: None,
        }
    }

    /// Tag reports with the presentation generation of the child.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Set the callback that receives a report after each layout pass.
    pub fn with_observer(mut self, observer: impl Fn(GeometryReport) + 'static) -> Self {
        self.observer = Some(Rc::new(observer));
        self
    }

    /// The report from the most recent layout pass.
    pub fn last_report(&self) -> Option<GeometryReport> {
        self.last_report
    }
}

impl<M> Widget<M> for MeasureProbe<M> {
    fn render(&self, canvas: &mut Canvas, region: Region) {
        self.child.render(canvas, region);
    }

    fn desired_size(&self) -> Size {
        self.child.desired_size()
    }

    fn layout(&mut self, region: Region) {
        // Layout may change the child's natural height (it can read shared
        // state), so measure again afterwards and settle on the new value.
        let before = self.child.desired_size().height;
        self.child
            .layout(Region::new(region.x, region.y, region.width, before as i32));
        let after = self.child.desired_size().height;
        if after != before {
            self.child
                .layout(Region::new(region.x, region.y, region.width, after as i32));
        }

        let report = GeometryReport {
            generation: self.generation,
            size: Size::new(region.width.clamp(0, u16::MAX as i32) as u16, after),
        };
        self.last_report = Some(report);
        if let Some(observer) = &self.observer {
            observer(report);
        }
    }

    fn needs_layout(&self) -> bool {
        self.child.needs_layout()
    }

    fn on_event(&mut self, key: KeyCode) -> Option<M> {
        self.child.on_event(key)
    }

    fn on_mouse(&mut self, event: MouseEvent, region: Region) -> Option<M> {
        self.child.on_mouse(event, region)
    }
}
