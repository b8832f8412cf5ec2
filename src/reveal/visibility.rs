use std::collections::HashMap;

use kurbo::Rect;

use crate::foundation::{
    error::{UndanganError, UndanganResult},
    ids::NodeId,
};

/// When an element counts as "in view".
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisibilityRegion {
    /// Visible share of the element's area that must be reached, in `[0, 1]`.
    /// Zero means "any visible pixel".
    #[serde(default)]
    pub threshold_fraction: f64,
    /// Reveal at most once per mount.
    #[serde(default = "default_fire_once")]
    pub fire_once: bool,
}

fn default_fire_once() -> bool {
    true
}

impl Default for VisibilityRegion {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.0,
            fire_once: true,
        }
    }
}

impl VisibilityRegion {
    /// Build a validated region.
    pub fn new(threshold_fraction: f64, fire_once: bool) -> UndanganResult<Self> {
        let region = Self {
            threshold_fraction,
            fire_once,
        };
        region.validate()?;
        Ok(region)
    }

    /// Check the threshold range.
    pub fn validate(&self) -> UndanganResult<()> {
        if !(0.0..=1.0).contains(&self.threshold_fraction) {
            return Err(UndanganError::validation(format!(
                "visibility threshold must be within [0, 1], got {}",
                self.threshold_fraction
            )));
        }
        Ok(())
    }

    /// Whether a sampled fraction is "in view". `None` (geometry unavailable) always is.
    pub fn is_met(&self, fraction: Option<f64>) -> bool {
        let Some(fraction) = fraction else {
            return true;
        };
        if self.threshold_fraction <= 0.0 {
            fraction > 0.0
        } else {
            fraction >= self.threshold_fraction
        }
    }
}

/// Per-element edge detector turning fraction samples into deduplicated visibility events.
#[derive(Clone, Debug)]
pub struct Observation {
    region: VisibilityRegion,
    last: Option<bool>,
    done: bool,
}

impl Observation {
    /// Start observing with no prior state.
    pub fn new(region: VisibilityRegion) -> Self {
        Self {
            region,
            last: None,
            done: false,
        }
    }

    /// Region this observation evaluates.
    pub fn region(&self) -> VisibilityRegion {
        self.region
    }

    /// True once a fire-once observation has reported its single `true`.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one sample; returns an event only when the in-view state changes. A fire-once
    /// observation completes on its first `true`.
    pub fn push(&mut self, fraction: Option<f64>) -> Option<bool> {
        let event = self.track(fraction)?;
        if event {
            self.complete();
        }
        Some(event)
    }

    /// Like [`Observation::push`] but never completes on its own; the owner calls
    /// [`Observation::complete`] once the reveal this observation gates has started.
    pub fn track(&mut self, fraction: Option<f64>) -> Option<bool> {
        if self.done {
            return None;
        }
        let visible = self.region.is_met(fraction);
        if self.last == Some(visible) {
            return None;
        }
        let first = self.last.is_none();
        self.last = Some(visible);
        if first && !visible {
            return None;
        }
        Some(visible)
    }

    /// Stop a fire-once observation. Re-arming observations keep running.
    pub fn complete(&mut self) {
        if self.region.fire_once {
            self.done = true;
        }
    }
}

/// Lazy event stream produced by [`observe`].
#[derive(Clone, Debug)]
pub struct VisibilityEvents<I> {
    observation: Observation,
    samples: I,
}

impl<I> Iterator for VisibilityEvents<I>
where
    I: Iterator<Item = Option<f64>>,
{
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        while !self.observation.is_done() {
            let sample = self.samples.next()?;
            if let Some(event) = self.observation.push(sample) {
                return Some(event);
            }
        }
        None
    }
}

/// Observe a (possibly infinite) stream of visible-fraction samples for one element.
pub fn observe<I>(region: VisibilityRegion, samples: I) -> VisibilityEvents<I::IntoIter>
where
    I: IntoIterator<Item = Option<f64>>,
{
    VisibilityEvents {
        observation: Observation::new(region),
        samples: samples.into_iter(),
    }
}

/// Geometry capability supplied by the host platform.
pub trait Geometry {
    /// Visible share of the node's element, or `None` when it cannot be measured.
    fn visible_fraction(&self, node: NodeId) -> Option<f64>;
}

/// Scrollable page: element boxes in page coordinates and a viewport window over them.
#[derive(Clone, Debug)]
pub struct PageViewport {
    size: kurbo::Size,
    scroll_y: f64,
    elements: HashMap<NodeId, Rect>,
}

impl PageViewport {
    /// Viewport of `width` x `height` at the top of the page.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: kurbo::Size::new(width, height),
            scroll_y: 0.0,
            elements: HashMap::new(),
        }
    }

    /// Record where a node's element is laid out.
    pub fn place(&mut self, node: NodeId, rect: Rect) {
        self.elements.insert(node, rect);
    }

    /// Scroll so the viewport's top edge sits at page offset `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    /// Current viewport rectangle in page coordinates.
    pub fn window(&self) -> Rect {
        Rect::from_origin_size((0.0, self.scroll_y), self.size)
    }
}

impl Geometry for PageViewport {
    fn visible_fraction(&self, node: NodeId) -> Option<f64> {
        let rect = self.elements.get(&node)?.abs();
        let window = self.window();
        let area = rect.area();
        if area <= 0.0 {
            let inside = window.contains(rect.origin());
            return Some(if inside { 1.0 } else { 0.0 });
        }
        let overlap = rect.intersect(window);
        Some((overlap.area() / area).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/visibility.rs"]
mod tests;
