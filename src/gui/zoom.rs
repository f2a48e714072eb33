//! Pan and zoom of whole scenes.
//!
//! A single [`ZoomBehavior`] can drive several scenes. Every gesture computes
//! a new transform, clamps its scale to the configured extent and writes it
//! to the `transform` attribute of each scene's top-level groups, replacing
//! whatever was there.

use super::scene::{RenderedElement, Scene};
use std::fmt;

/// Scale extent applied when none is configured.
pub const DEFAULT_SCALE_EXTENT: (f64, f64) = (0.3, 5.0);

/// Wheel delta to zoom exponent factor (pixel delta mode).
const WHEEL_DELTA_FACTOR: f64 = 0.002;

/// Uniform scale followed by translation: `screen = scene * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// Map a scene point to screen coordinates
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        (point.0 * self.k + self.x, point.1 * self.k + self.y)
    }

    /// Map a screen point back to scene coordinates
    pub fn invert(&self, point: (f64, f64)) -> (f64, f64) {
        ((point.0 - self.x) / self.k, (point.1 - self.y) / self.k)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for ViewTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

/// Write `transform` to the top-level groups of every scene.
pub fn apply_transform<'a, S, I>(scenes: I, transform: &ViewTransform)
where
    S: Scene + 'a,
    I: IntoIterator<Item = &'a mut S>,
{
    let value = transform.to_string();
    for scene in scenes {
        for group in scene.top_level_groups() {
            if let Some(el) = scene.element_mut(group) {
                el.set_attribute("transform", value.clone());
            }
        }
    }
}

/// Gesture recognizer and handler for pan/zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomBehavior {
    scale_extent: (f64, f64),
    transform: ViewTransform,
}

impl ZoomBehavior {
    pub fn new() -> Self {
        Self::with_scale_extent(DEFAULT_SCALE_EXTENT.0, DEFAULT_SCALE_EXTENT.1)
    }

    /// Create a behavior limited to scales in `[min, max]`.
    ///
    /// Bounds that are NaN or not positive fall back to
    /// [`DEFAULT_SCALE_EXTENT`]; an inverted pair is swapped.
    pub fn with_scale_extent(min: f64, max: f64) -> Self {
        let usable = |k: f64| k > 0.0;
        let min = if usable(min) { min } else { DEFAULT_SCALE_EXTENT.0 };
        let max = if usable(max) { max } else { DEFAULT_SCALE_EXTENT.1 };
        Self {
            scale_extent: (min.min(max), min.max(max)),
            transform: ViewTransform::IDENTITY,
        }
    }

    pub fn scale_extent(&self) -> (f64, f64) {
        self.scale_extent
    }

    /// The last applied transform
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Clamp the scale of `transform` to the scale extent.
    pub fn constrain(&self, transform: ViewTransform) -> ViewTransform {
        let (min, max) = self.scale_extent;
        ViewTransform {
            k: transform.k.clamp(min, max),
            ..transform
        }
    }

    /// Replace the current transform and apply it to `scenes`.
    pub fn transform_to<'a, S, I>(&mut self, scenes: I, transform: ViewTransform) -> ViewTransform
    where
        S: Scene + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        let transform = self.constrain(transform);
        if transform.k != self.transform.k {
            tracing::debug!(k = transform.k, "zoom");
        }
        self.transform = transform;
        apply_transform(scenes, &transform);
        transform
    }

    /// Zoom to scale `k`, keeping the screen point `anchor` fixed.
    pub fn scale_to<'a, S, I>(&mut self, scenes: I, k: f64, anchor: (f64, f64)) -> ViewTransform
    where
        S: Scene + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        let (min, max) = self.scale_extent;
        let k = k.clamp(min, max);
        let (px, py) = self.transform.invert(anchor);
        let next = ViewTransform::new(k, anchor.0 - px * k, anchor.1 - py * k);
        self.transform_to(scenes, next)
    }

    /// Multiply the current scale by `factor` around `anchor`.
    pub fn scale_by<'a, S, I>(&mut self, scenes: I, factor: f64, anchor: (f64, f64)) -> ViewTransform
    where
        S: Scene + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        self.scale_to(scenes, self.transform.k * factor, anchor)
    }

    /// Pan by a screen-space offset.
    pub fn translate_by<'a, S, I>(&mut self, scenes: I, dx: f64, dy: f64) -> ViewTransform
    where
        S: Scene + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        let t = self.transform;
        self.transform_to(scenes, ViewTransform::new(t.k, t.x + dx, t.y + dy))
    }

    /// Wheel gesture: negative `delta_y` zooms in around `anchor`.
    pub fn wheel<'a, S, I>(&mut self, scenes: I, delta_y: f64, anchor: (f64, f64)) -> ViewTransform
    where
        S: Scene + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        let factor = 2f64.powf(-delta_y * WHEEL_DELTA_FACTOR);
        self.scale_by(scenes, factor, anchor)
    }
}

impl Default for ZoomBehavior {
    fn default() -> Self {
        Self::new()
    }
}
