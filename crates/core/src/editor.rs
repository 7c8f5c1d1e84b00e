//! Control-point editing: insertion, removal, dragging and consolidation.
//!
//! Three layers, from lowest to highest:
//!
//! - in-place methods on [`ColorMap`] (`insert_control_point`, ...);
//! - copy-on-write free functions ([`insert`], [`remove`], [`move_point`],
//!   [`consolidate`], ...) that take a map by reference and return the edited
//!   copy, leaving the input untouched;
//! - [`ColorMapEditor`], an editing session that owns a map, tracks the drag
//!   gesture in progress and notifies subscribers after every change.
//!
//! Every operation is total. Invalid input (NaN positions, out-of-range
//! indices, removals below two stops) is clamped or rejected with a
//! `log::warn!`, and a rejected operation leaves the map unchanged.
//!
//! Ties (several stops at one position) may appear while dragging.
//! [`DragSession`] keeps them stable by moving a single representative and
//! pinning the rest; [`consolidate`] resolves them when the gesture ends.

use crate::color::Color;
use crate::colormap::{ColorMap, ControlPoint, InterpolationMethod};
use crate::interpolate::color_at;
use crate::throttle::Throttle;
use std::ops::Range;
use std::time::Instant;

/// Fewest stops an edited map may be reduced to by [`remove`].
pub const MIN_CONTROL_POINTS: usize = 2;

impl ColorMap {
    /// Inserts a stop at `position`, colored with the gradient's current
    /// color there, and returns its index.
    ///
    /// The stop goes before the first point positioned strictly after it, so
    /// existing ties keep their order. NaN is rejected (returns `None`);
    /// positions outside the range are clamped.
    pub fn insert_control_point(&mut self, position: f64) -> Option<usize> {
        if position.is_nan() {
            log::warn!("refusing to insert a control point at NaN");
            return None;
        }
        let position = self.clamp_to_range(position);
        let color = color_at(self, position);
        let index = self
            .control_points
            .partition_point(|p| p.position <= position);
        self.control_points
            .insert(index, ControlPoint::new(color, position));
        Some(index)
    }

    /// Removes the stop at `index`. Returns false, leaving the map
    /// unchanged, if the index is out of range or fewer than
    /// [`MIN_CONTROL_POINTS`] would remain.
    pub fn remove_control_point(&mut self, index: usize) -> bool {
        let len = self.control_points.len();
        if index >= len {
            log::warn!("no control point at index {index} (have {len})");
            return false;
        }
        if len <= MIN_CONTROL_POINTS {
            log::warn!("a color map keeps at least {MIN_CONTROL_POINTS} control points");
            return false;
        }
        self.control_points.remove(index);
        true
    }

    /// Recolors the stop at `index`. Returns false if out of range.
    pub fn set_control_point_color(&mut self, index: usize, color: Color) -> bool {
        match self.control_points.get_mut(index) {
            Some(point) => {
                point.color = color;
                true
            }
            None => {
                log::warn!("no control point at index {index} to recolor");
                false
            }
        }
    }

    pub fn set_interpolation_method(&mut self, method: InterpolationMethod) {
        self.interpolation_method = method;
    }

    /// Resolves ties and out-of-range stops.
    ///
    /// Positions are clamped into the range (NaN goes to the start) and
    /// restored to ascending order with a stable sort. Then:
    /// - of several stops at `start_range`, only the last is kept;
    /// - of several stops at `end_range`, only the first is kept;
    /// - an interior stop whose predecessor and successor share its exact
    ///   position is removed, leaving the two stops that form a hard edge.
    ///
    /// Idempotent.
    pub fn consolidate_control_points(&mut self) {
        let (start, end) = (self.start_range, self.end_range);
        for point in &mut self.control_points {
            if point.position.is_nan() {
                log::warn!("control point with NaN position moved to {start}");
                point.position = start;
            } else if point.position < start || point.position > end {
                point.position = point.position.clamp(start, end);
            }
        }
        if !self.is_sorted() {
            self.control_points
                .sort_by(|a, b| a.position.total_cmp(&b.position));
        }

        let points = &mut self.control_points;

        let at_start = points.iter().take_while(|p| p.position == start).count();
        if at_start > 1 {
            points.drain(..at_start - 1);
        }

        let at_end = points.iter().rev().take_while(|p| p.position == end).count();
        if at_end > 1 {
            points.truncate(points.len() - at_end + 1);
        }

        let n = points.len();
        let buried: Vec<bool> = (0..n)
            .map(|i| {
                i > 0
                    && i + 1 < n
                    && points[i - 1].position == points[i].position
                    && points[i + 1].position == points[i].position
            })
            .collect();
        let mut flags = buried.into_iter();
        points.retain(|_| !flags.next().unwrap_or(false));
    }

    fn clamp_to_range(&self, position: f64) -> f64 {
        if position < self.start_range || position > self.end_range {
            log::warn!(
                "position {position} outside [{}, {}]; clamping",
                self.start_range,
                self.end_range
            );
            position.clamp(self.start_range, self.end_range)
        } else {
            position
        }
    }
}

/// Returns a copy of `map` with a stop inserted at `position`.
pub fn insert(map: &ColorMap, position: f64) -> ColorMap {
    let mut next = map.clone();
    next.insert_control_point(position);
    next
}

/// Returns a copy of `map` without the stop at `index` (or an unchanged copy
/// if the removal is not allowed).
pub fn remove(map: &ColorMap, index: usize) -> ColorMap {
    let mut next = map.clone();
    next.remove_control_point(index);
    next
}

/// Returns a copy of `map` with stop `index` dragged towards `position`, as
/// a one-step [`DragSession`]. Ties are not consolidated.
pub fn move_point(map: &ColorMap, index: usize, position: f64) -> ColorMap {
    let mut next = map.clone();
    if let Some(mut drag) = DragSession::begin(&next, index) {
        drag.update(&mut next, position);
    }
    next
}

/// Returns a consolidated copy of `map`.
pub fn consolidate(map: &ColorMap) -> ColorMap {
    let mut next = map.clone();
    next.consolidate_control_points();
    next
}

/// Returns a copy of `map` using `method`.
pub fn set_interpolation_method(map: &ColorMap, method: InterpolationMethod) -> ColorMap {
    let mut next = map.clone();
    next.set_interpolation_method(method);
    next
}

/// Returns a copy of `map` with stop `index` recolored.
pub fn set_color(map: &ColorMap, index: usize, color: Color) -> ColorMap {
    let mut next = map.clone();
    next.set_control_point_color(index, color);
    next
}

/// State captured when a drag gesture starts on a stop.
///
/// Records the stop's original position and the run of indices sharing it.
/// While dragging, every stop in that run is pinned to the original position
/// except one representative: the highest index when moving right, the
/// lowest when moving left. The representative never passes its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    origin: f64,
    tied: Range<usize>,
    active: usize,
}

impl DragSession {
    /// Starts dragging stop `index`. `None` if the index is out of range.
    pub fn begin(map: &ColorMap, index: usize) -> Option<Self> {
        let points = &map.control_points;
        let origin = points.get(index)?.position;
        let first = points[..index]
            .iter()
            .rposition(|p| p.position != origin)
            .map_or(0, |i| i + 1);
        let last = points[index..]
            .iter()
            .position(|p| p.position != origin)
            .map_or(points.len(), |i| index + i);
        Some(Self {
            origin,
            tied: first..last,
            active: index,
        })
    }

    /// Index of the stop currently following the pointer.
    pub fn index(&self) -> usize {
        self.active
    }

    /// Position of the dragged stop when the gesture began.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Indices that shared the original position.
    pub fn tied(&self) -> Range<usize> {
        self.tied.clone()
    }

    /// Moves the representative towards `position` and returns its index.
    ///
    /// The position is clamped into the map's range and then between the
    /// representative's immediate neighbours. NaN is ignored with a warning.
    pub fn update(&mut self, map: &mut ColorMap, position: f64) -> usize {
        if position.is_nan() {
            log::warn!("ignoring drag to NaN position");
            return self.active;
        }
        let (start, end) = (map.start_range, map.end_range);
        let points = &mut map.control_points;
        // Every tied stop but the representative must still sit at the origin.
        let stale = self.tied.end > points.len()
            || self
                .tied
                .clone()
                .any(|i| i != self.active && points[i].position != self.origin);
        if stale {
            log::warn!("color map changed under a drag; ignoring update");
            return self.active;
        }

        let position = position.clamp(start, end);
        for point in &mut points[self.tied.clone()] {
            point.position = self.origin;
        }

        let rep = if position > self.origin {
            self.tied.end - 1
        } else if position < self.origin {
            self.tied.start
        } else {
            self.active
        };

        let lower = if rep > 0 {
            points[rep - 1].position
        } else {
            start
        };
        let upper = points.get(rep + 1).map_or(end, |p| p.position);
        // max/min rather than clamp: an unsorted map may have lower > upper.
        points[rep].position = position.max(lower).min(upper);
        self.active = rep;
        rep
    }

    /// Ends the gesture and consolidates the map.
    pub fn finish(self, map: &mut ColorMap) {
        map.consolidate_control_points();
    }
}

/// Handle returned by [`ColorMapEditor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&ColorMap)>;

/// An editing session over one color map.
///
/// Owns the map and the drag gesture in progress, and notifies subscribers
/// after every change. Any gesture-ending path ([`end_drag`],
/// [`cancel_drag`], or starting a new drag) consolidates the map.
///
/// [`end_drag`]: ColorMapEditor::end_drag
/// [`cancel_drag`]: ColorMapEditor::cancel_drag
pub struct ColorMapEditor {
    map: ColorMap,
    drag: Option<DragSession>,
    pending: Option<f64>,
    throttle: Throttle,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl ColorMapEditor {
    pub fn new(map: ColorMap) -> Self {
        Self::with_throttle(map, Throttle::default())
    }

    pub fn with_throttle(map: ColorMap, throttle: Throttle) -> Self {
        Self {
            map,
            drag: None,
            pending: None,
            throttle,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn map(&self) -> &ColorMap {
        &self.map
    }

    /// Ends any gesture in progress and returns the map.
    pub fn into_map(mut self) -> ColorMap {
        if self.drag.is_some() {
            self.end_drag();
        }
        self.map
    }

    /// Registers a callback run with the map after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&ColorMap) + 'static,
    {
        let handle = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Drops a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(handle, _)| *handle != subscription);
        self.listeners.len() != before
    }

    pub fn insert(&mut self, position: f64) -> Option<usize> {
        self.end_gesture_if_any();
        let index = self.map.insert_control_point(position);
        if index.is_some() {
            self.notify();
        }
        index
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.end_gesture_if_any();
        let removed = self.map.remove_control_point(index);
        if removed {
            self.notify();
        }
        removed
    }

    pub fn set_color(&mut self, index: usize, color: Color) -> bool {
        let changed = self.map.set_control_point_color(index, color);
        if changed {
            self.notify();
        }
        changed
    }

    pub fn set_interpolation_method(&mut self, method: InterpolationMethod) {
        self.map.set_interpolation_method(method);
        self.notify();
    }

    /// Consolidates the map. A drag in progress is ended first, which
    /// already consolidates.
    pub fn consolidate(&mut self) {
        if self.drag.is_some() {
            self.end_drag();
            return;
        }
        self.map.consolidate_control_points();
        self.notify();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Index of the stop being dragged, if any.
    pub fn dragged_index(&self) -> Option<usize> {
        self.drag.as_ref().map(DragSession::index)
    }

    /// Starts dragging stop `index`, ending any earlier gesture first.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        self.end_gesture_if_any();
        match DragSession::begin(&self.map, index) {
            Some(session) => {
                self.drag = Some(session);
                self.throttle.reset();
                true
            }
            None => {
                log::warn!("cannot drag control point {index}: no such index");
                false
            }
        }
    }

    /// Moves the dragged stop towards `position`. Returns the index of the
    /// stop that moved, or `None` when no drag is in progress.
    pub fn drag_to(&mut self, position: f64) -> Option<usize> {
        let drag = self.drag.as_mut()?;
        let index = drag.update(&mut self.map, position);
        self.pending = None;
        self.notify();
        Some(index)
    }

    /// Like [`drag_to`](Self::drag_to), but at most once per throttle
    /// interval. A skipped position is remembered and applied by
    /// [`end_drag`](Self::end_drag), so throttling never changes the result.
    pub fn drag_to_throttled(&mut self, position: f64, now: Instant) -> Option<usize> {
        self.drag.as_ref()?;
        if self.throttle.ready(now) {
            self.drag_to(position)
        } else {
            self.pending = Some(position);
            None
        }
    }

    /// Ends the gesture: applies any throttled position, then consolidates.
    pub fn end_drag(&mut self) {
        if let Some(position) = self.pending.take() {
            self.drag_to(position);
        }
        self.finish_drag();
    }

    /// Aborts the gesture (focus loss, escape): drops any throttled position
    /// and still consolidates, so the map is left valid.
    pub fn cancel_drag(&mut self) {
        self.pending = None;
        self.finish_drag();
    }

    fn end_gesture_if_any(&mut self) {
        if self.drag.is_some() {
            self.end_drag();
        }
    }

    fn finish_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            session.finish(&mut self.map);
            self.notify();
        }
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.map);
        }
    }
}

impl std::fmt::Debug for ColorMapEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorMapEditor")
            .field("map", &self.map)
            .field("drag", &self.drag)
            .field("pending", &self.pending)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}
