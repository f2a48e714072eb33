//! Viewbox computation from node positions.

use std::fmt;

/// Padding added around the node extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBoxMargin {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for ViewBoxMargin {
    fn default() -> Self {
        Self {
            horizontal: 200.0,
            vertical: 100.0,
        }
    }
}

/// The visible coordinate window of a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// Fit a viewbox around a set of positions.
///
/// The extents are padded by `margin` on every side. An empty set yields
/// `0 0 0 0`. Non-finite coordinates are ignored.
pub fn view_box<I>(positions: I, margin: ViewBoxMargin) -> ViewBox
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut bounds: Option<(f64, f64, f64, f64)> = None;

    for (x, y) in positions {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    match bounds {
        None => ViewBox::default(),
        Some((min_x, min_y, max_x, max_y)) => ViewBox {
            min_x: min_x - margin.horizontal,
            min_y: min_y - margin.vertical,
            width: max_x - min_x + 2.0 * margin.horizontal,
            height: max_y - min_y + 2.0 * margin.vertical,
        },
    }
}
