//! Axis label planning.
//!
//! Spacing candidates run 10, 5, 2, 1, 0.5 ... times a power of ten. Each
//! candidate is rendered and measured; the densest set whose total label
//! extent fits the pixel budget wins.

use crate::transform::ViewMapping;
use sigmet_core::{Axis, LabelFormatter};

/// Candidates with more coordinates than this count as overflowing
pub const MAX_CANDIDATE_LABELS: usize = 512;

/// Multipliers applied in turn to reach the next denser spacing
const SPACING_STEPS: [f64; 3] = [0.5, 0.4, 0.5];

// ============================================================================
// COORDINATE LISTS
// ============================================================================

/// Multiples of `spacing` covering `[min, max]`, keeping values within
/// `spacing / 4` of either end. The order of `min` and `max` does not matter.
pub fn coord_list(min: f64, max: f64, spacing: f64) -> Vec<f64> {
    let (min, max) = if min > max { (max, min) } else { (min, max) };

    if !(spacing > 0.0 && spacing.is_finite() && min.is_finite() && max.is_finite()) {
        return Vec::new();
    }

    let slack = spacing / 4.0;
    let first = (min / spacing).floor();
    let steps = ((max - min) / spacing).ceil() as usize + 1;

    (0..=steps)
        .map(|n| (first + n as f64) * spacing)
        .filter(|&x| x >= min - slack && x <= max + slack)
        .collect()
}

/// Number of coordinates `coord_list` would produce, at most
fn candidate_size(min: f64, max: f64, spacing: f64) -> f64 {
    ((max - min).abs() / spacing).ceil() + 2.0
}

// ============================================================================
// LABEL PLAN
// ============================================================================

/// Outcome of label planning for one axis
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlan {
    /// Accepted spacing (`None` for a degenerate interval or no labels)
    pub spacing: Option<f64>,
    /// Coordinates of the applied labels
    pub coords: Vec<f64>,
    /// Extent reported by the final application
    pub extent: f64,
}

impl LabelPlan {
    fn applied<F>(spacing: Option<f64>, coords: Vec<f64>, apply: &mut F) -> Self
    where
        F: FnMut(&[f64]) -> f64,
    {
        let extent = apply(&coords);
        Self {
            spacing,
            coords,
            extent,
        }
    }
}

/// Choose label spacing for `[lo, hi]` and leave the chosen labels applied.
///
/// `apply` renders a coordinate list and returns its total extent in pixels.
/// A degenerate interval gets one label at `lo`. If even the coarsest
/// candidate exceeds `budget`, no labels are applied.
pub fn plan_labels<F>(lo: f64, hi: f64, budget: f64, mut apply: F) -> LabelPlan
where
    F: FnMut(&[f64]) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) {
        return LabelPlan::applied(None, Vec::new(), &mut apply);
    }
    if lo == hi {
        return LabelPlan::applied(None, vec![lo], &mut apply);
    }

    let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
    let mut spacing = 10.0_f64.powf((hi - lo).log10().ceil());
    let mut accepted: Option<(f64, Vec<f64>)> = None;

    for step in SPACING_STEPS.iter().cycle() {
        if !(spacing > 0.0 && spacing.is_finite())
            || candidate_size(lo, hi, spacing) > MAX_CANDIDATE_LABELS as f64
        {
            break;
        }

        let candidate = coord_list(lo, hi, spacing);
        if candidate.len() > MAX_CANDIDATE_LABELS || apply(&candidate) > budget {
            break;
        }

        accepted = Some((spacing, candidate));
        spacing *= step;
    }

    match accepted {
        Some((spacing, coords)) => {
            tracing::trace!(spacing, count = coords.len(), "label spacing accepted");
            LabelPlan::applied(Some(spacing), coords, &mut apply)
        }
        None => {
            tracing::debug!(lo, hi, budget, "no label spacing fits the axis");
            LabelPlan::applied(None, Vec::new(), &mut apply)
        }
    }
}

// ============================================================================
// LABEL POOL
// ============================================================================

/// Reusable label entries keyed by ordinal, with an explicit active count.
/// The pool grows on demand and never shrinks.
#[derive(Debug, Clone)]
pub struct LabelPool<E> {
    entries: Vec<E>,
    active: usize,
}

impl<E> LabelPool<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            active: 0,
        }
    }

    /// Number of entries ever created
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in use by the last application
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Entry at `index`, creating entries up to it as needed
    pub fn entry_or_create(&mut self, index: usize, mut create: impl FnMut() -> E) -> &E {
        while self.entries.len() <= index {
            self.entries.push(create());
        }
        &self.entries[index]
    }

    /// Mark the first `count` entries as in use; returns the spare entries
    pub fn set_active(&mut self, count: usize) -> &[E] {
        self.active = count.min(self.entries.len());
        &self.entries[self.active..]
    }
}

impl<E> Default for LabelPool<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// STRATEGY PATTERN: Label Surface
// ============================================================================

/// Where label entries (text plus tick mark) are drawn and measured
pub trait LabelSurface {
    type Entry;

    /// Create a new, hidden entry for `axis`
    fn create_entry(&mut self, axis: Axis) -> Self::Entry;

    /// Show `entry` at outer SVG `position` with `text`; returns the label's
    /// extent along the axis (width for horizontal, height for vertical)
    fn show_entry(&mut self, entry: &Self::Entry, axis: Axis, position: f64, text: &str) -> f64;

    fn hide_entry(&mut self, entry: &Self::Entry);
}

/// Draw `coords` on `axis` through the pool; returns the summed extent of
/// the labels that fall inside the plot frame.
pub fn apply_axis_labels<S: LabelSurface>(
    pool: &mut LabelPool<S::Entry>,
    surface: &mut S,
    mapping: &ViewMapping,
    axis: Axis,
    coords: &[f64],
    formatter: &dyn LabelFormatter,
) -> f64 {
    let frame = mapping.frame();
    let mut extent = 0.0;

    for (i, &coord) in coords.iter().enumerate() {
        let entry = pool.entry_or_create(i, || surface.create_entry(axis));
        let position = mapping.cartesian_to_svg(coord, axis);

        if frame.contains(axis, position) {
            extent += surface.show_entry(entry, axis, position, &formatter.format(coord));
        } else {
            surface.hide_entry(entry);
        }
    }

    for entry in pool.set_active(coords.len()) {
        surface.hide_entry(entry);
    }

    extent
}

// ============================================================================
// TESTS
// ============================================================================
