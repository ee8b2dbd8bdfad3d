//! Layout system for group sizing and child positioning.
//!
//! Both passes go through [`GroupLayout`]: pass 1 calls [`GroupLayout::measure`]
//! bottom-up when a group closes, pass 2 calls [`GroupLayout::arrange`] top-down
//! before the group's first child is placed. Everything is in virtual units.

use tandem_shared::Vec2;

/// A rectangle in virtual coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from position and size.
    #[must_use]
    pub const fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            width: size.x,
            height: size.y,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns true if `other` lies entirely inside this rectangle, allowing
    /// `epsilon` of floating-point slack on every edge.
    #[must_use]
    pub fn encloses(&self, other: &Self, epsilon: f32) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.bottom() <= self.bottom() + epsilon
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Shrinks the rectangle by a margin on each side.
    #[must_use]
    pub fn inset(&self, margin: Margin) -> Self {
        Self::new(
            self.x + margin.left,
            self.y + margin.top,
            (self.width - margin.horizontal()).max(0.0),
            (self.height - margin.vertical()).max(0.0),
        )
    }
}

/// Four-sided group margin, in virtual units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margin {
    /// Left side.
    pub left: f32,
    /// Top side.
    pub top: f32,
    /// Right side.
    pub right: f32,
    /// Bottom side.
    pub bottom: f32,
}

impl Margin {
    /// No margin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Specifies all four sides individually.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Same margin on all sides.
    #[must_use]
    pub const fn all(m: f32) -> Self {
        Self::new(m, m, m, m)
    }

    /// `x` on left and right, `y` on top and bottom.
    #[must_use]
    pub const fn symmetric(x: f32, y: f32) -> Self {
        Self::new(x, y, x, y)
    }

    /// Left + right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top + bottom.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total extent added to a size.
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.horizontal(), self.vertical())
    }
}

impl From<f32> for Margin {
    fn from(m: f32) -> Self {
        Self::all(m)
    }
}

/// Axis children are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Horizontal (left to right).
    #[default]
    Horizontal,
    /// Vertical (top to bottom).
    Vertical,
    /// Stacked on top of one another, sharing the origin.
    Overlay,
}

/// Alignment on one axis. Top and Left are the same thing on their
/// respective axis, as are Bottom and Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align to start (left/top).
    #[default]
    Start,
    /// Align to center.
    Center,
    /// Align to end (right/bottom).
    End,
}

impl Alignment {
    /// Alias of [`Alignment::Start`] for the vertical axis.
    pub const TOP: Self = Self::Start;
    /// Alias of [`Alignment::Start`] for the horizontal axis.
    pub const LEFT: Self = Self::Start;
    /// Alias of [`Alignment::End`] for the vertical axis.
    pub const BOTTOM: Self = Self::End;
    /// Alias of [`Alignment::End`] for the horizontal axis.
    pub const RIGHT: Self = Self::End;

    /// Fraction of the free space placed before the element.
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }

    /// Offset of an element of `size` inside `available` space.
    #[must_use]
    pub fn offset(self, available: f32, size: f32) -> f32 {
        (available - size) * self.factor()
    }
}

/// How a group lays out its children.
///
/// For example `HorizontalTop` lays elements out left to right, aligning
/// elements of uneven height along the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Left to right, top-aligned.
    #[default]
    HorizontalTop,
    /// Left to right, vertically centered.
    HorizontalCenter,
    /// Left to right, bottom-aligned.
    HorizontalBottom,
    /// Top to bottom, left-aligned.
    VerticalLeft,
    /// Top to bottom, horizontally centered.
    VerticalCenter,
    /// Top to bottom, right-aligned.
    VerticalRight,
    /// On top of one another, centered.
    Overlay,
}

impl Layout {
    /// Primary direction.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::HorizontalTop | Self::HorizontalCenter | Self::HorizontalBottom => {
                Direction::Horizontal
            }
            Self::VerticalLeft | Self::VerticalCenter | Self::VerticalRight => Direction::Vertical,
            Self::Overlay => Direction::Overlay,
        }
    }

    /// Cross-axis alignment (both axes for overlay).
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        match self {
            Self::HorizontalTop | Self::VerticalLeft => Alignment::Start,
            Self::HorizontalCenter | Self::VerticalCenter | Self::Overlay => Alignment::Center,
            Self::HorizontalBottom | Self::VerticalRight => Alignment::End,
        }
    }
}

/// Layout parameters of one group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupLayout {
    /// Direction and alignment.
    pub layout: Layout,
    /// Gap between consecutive children on the primary axis.
    pub spacing: f32,
    /// Inset applied before children are placed.
    pub margin: Margin,
}

impl GroupLayout {
    /// Creates a layout without margin.
    #[must_use]
    pub const fn new(layout: Layout, spacing: f32) -> Self {
        Self {
            layout,
            spacing,
            margin: Margin::ZERO,
        }
    }

    /// Sets the margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Size of the children's bounding box, without margins.
    #[must_use]
    pub fn content_size(&self, sizes: &[Vec2]) -> Vec2 {
        if sizes.is_empty() {
            return Vec2::ZERO;
        }

        let total_gap = self.spacing * (sizes.len() - 1) as f32;
        let max = sizes.iter().fold(Vec2::ZERO, |acc, s| acc.max(*s));

        match self.layout.direction() {
            Direction::Horizontal => {
                let total_width: f32 = sizes.iter().map(|s| s.x).sum();
                Vec2::new(total_width + total_gap, max.y)
            }
            Direction::Vertical => {
                let total_height: f32 = sizes.iter().map(|s| s.y).sum();
                Vec2::new(max.x, total_height + total_gap)
            }
            Direction::Overlay => max,
        }
    }

    /// Size of the group given its children's sizes (pass 1).
    #[must_use]
    pub fn measure(&self, sizes: &[Vec2]) -> Vec2 {
        self.content_size(sizes) + self.margin.extent()
    }

    /// Lays out a list of sizes within the given bounds (pass 2).
    ///
    /// `bounds` is the group's full rectangle; the margin is inset first.
    /// Returns the rectangle of each child.
    #[must_use]
    pub fn arrange(&self, bounds: Rect, sizes: &[Vec2]) -> Vec<Rect> {
        if sizes.is_empty() {
            return Vec::new();
        }

        let content = bounds.inset(self.margin);
        let align = self.layout.alignment();
        let mut results = Vec::with_capacity(sizes.len());

        match self.layout.direction() {
            Direction::Horizontal => {
                let mut x = content.x;
                for size in sizes {
                    let y = content.y + align.offset(content.height, size.y);
                    results.push(Rect::new(x, y, size.x, size.y));
                    x += size.x + self.spacing;
                }
            }
            Direction::Vertical => {
                let mut y = content.y;
                for size in sizes {
                    let x = content.x + align.offset(content.width, size.x);
                    results.push(Rect::new(x, y, size.x, size.y));
                    y += size.y + self.spacing;
                }
            }
            Direction::Overlay => {
                for size in sizes {
                    let x = content.x + align.offset(content.width, size.x);
                    let y = content.y + align.offset(content.height, size.y);
                    results.push(Rect::new(x, y, size.x, size.y));
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(list: &[(f32, f32)]) -> Vec<Vec2> {
        list.iter().map(|&(w, h)| Vec2::new(w, h)).collect()
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(Vec2::new(50.0, 30.0)));
        assert!(!rect.contains(Vec2::new(5.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 80.0)));
    }

    #[test]
    fn test_layout_horizontal() {
        let layout = GroupLayout::new(Layout::HorizontalTop, 10.0);
        let children = sizes(&[(30.0, 20.0), (40.0, 20.0), (30.0, 20.0)]);
        let bounds = Rect::from_pos_size(Vec2::ZERO, layout.measure(&children));

        let result = layout.arrange(bounds, &children);

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].x, 0.0);
        assert_eq!(result[1].x, 40.0); // 30 + 10 gap
        assert_eq!(result[2].x, 90.0); // 40 + 40 + 10 gap
        assert_eq!(bounds.width, 120.0);
    }

    #[test]
    fn test_horizontal_top_uneven_heights() {
        let layout = GroupLayout::new(Layout::HorizontalTop, 0.0);
        let children = sizes(&[(1.0, 3.0), (1.0, 1.0), (1.0, 2.0)]);
        let size = layout.measure(&children);
        assert_eq!(size, Vec2::new(3.0, 3.0));

        let result = layout.arrange(Rect::from_pos_size(Vec2::new(5.0, 7.0), size), &children);
        assert!(result.iter().all(|r| r.y == 7.0));
    }

    #[test]
    fn test_vertical_alignment_and_margin() {
        let layout = GroupLayout::new(Layout::VerticalRight, 2.0).with_margin(Margin::new(1.0, 2.0, 3.0, 4.0));
        let children = sizes(&[(10.0, 5.0), (4.0, 5.0)]);
        let size = layout.measure(&children);
        assert_eq!(size, Vec2::new(14.0, 18.0));

        let result = layout.arrange(Rect::from_pos_size(Vec2::ZERO, size), &children);
        assert_eq!(result[0], Rect::new(1.0, 2.0, 10.0, 5.0));
        assert_eq!(result[1], Rect::new(7.0, 9.0, 4.0, 5.0));
    }

    #[test]
    fn test_overlay_centers_children() {
        let layout = GroupLayout::new(Layout::Overlay, 5.0);
        let children = sizes(&[(10.0, 10.0), (4.0, 2.0)]);
        let size = layout.measure(&children);
        assert_eq!(size, Vec2::new(10.0, 10.0));

        let result = layout.arrange(Rect::from_pos_size(Vec2::ZERO, size), &children);
        assert_eq!(result[1], Rect::new(3.0, 4.0, 4.0, 2.0));
    }

    #[test]
    fn test_single_child_degenerates_to_child_plus_margin() {
        let layout = GroupLayout::new(Layout::VerticalCenter, 0.0).with_margin(Margin::all(3.0));
        assert_eq!(layout.measure(&sizes(&[(7.0, 9.0)])), Vec2::new(13.0, 15.0));
        assert_eq!(layout.measure(&[]), Vec2::new(6.0, 6.0));
    }
}
