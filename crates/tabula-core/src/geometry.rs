//! Geometry primitives shared by the renderable contract and the adapter.

/// A width/height pair in points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the extent along the given axis.
    pub fn main_axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// Insets applied to the edges of a view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Edge-wise maximum of two insets.
    pub fn max_each(self, other: EdgeInsets) -> EdgeInsets {
        EdgeInsets {
            top: self.top.max(other.top),
            left: self.left.max(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }
}

/// The constraint a component is measured against.
///
/// `Width` fixes the width and lets the height grow, which is how rows of a
/// vertical list are measured. `Height` is the transposed case.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeConstraint {
    Width(f32),
    Height(f32),
    Size(Size),
}

impl SizeConstraint {
    /// Upper bound used for the unconstrained dimension.
    pub const UNBOUNDED: f32 = f32::MAX;

    /// The target size handed to a view when laying it out for measurement.
    pub fn target_size(&self) -> Size {
        match *self {
            SizeConstraint::Width(width) => Size::new(width, Self::UNBOUNDED),
            SizeConstraint::Height(height) => Size::new(Self::UNBOUNDED, height),
            SizeConstraint::Size(size) => size,
        }
    }

    /// Builds the constraint used to measure items of a list scrolling along `axis`.
    pub fn for_axis(axis: Axis, bounds: Size) -> Self {
        match axis {
            Axis::Vertical => SizeConstraint::Width(bounds.width),
            Axis::Horizontal => SizeConstraint::Height(bounds.height),
        }
    }
}

/// Scroll axis of a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

/// Position of a row: section index plus row index within that section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl std::fmt::Display for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_each_takes_larger_edges() {
        let a = EdgeInsets::new(1.0, 8.0, 0.0, 2.0);
        let b = EdgeInsets::new(4.0, 2.0, 3.0, 2.0);
        assert_eq!(a.max_each(b), EdgeInsets::new(4.0, 8.0, 3.0, 2.0));
    }

    #[test]
    fn test_width_constraint_leaves_height_unbounded() {
        let target = SizeConstraint::Width(320.0).target_size();
        assert_eq!(target.width, 320.0);
        assert_eq!(target.height, SizeConstraint::UNBOUNDED);
    }

    #[test]
    fn test_constraint_follows_scroll_axis() {
        let bounds = Size::new(320.0, 480.0);
        assert_eq!(
            SizeConstraint::for_axis(Axis::Vertical, bounds),
            SizeConstraint::Width(320.0)
        );
        assert_eq!(
            SizeConstraint::for_axis(Axis::Horizontal, bounds),
            SizeConstraint::Height(480.0)
        );
    }
}
