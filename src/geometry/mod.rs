//! Geometric primitives for word and symbol boxes.
//!
//! OCR engines report each box as four corners in reading order:
//! upper-left, upper-right, lower-right, lower-left. Coordinates are either
//! pixels or fractions of the page size; the two are never mixed inside one
//! box, and every predicate here works the same way on both.

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate (grows downwards)
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_oxide::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which coordinate set a box was reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSpace {
    /// Absolute pixel coordinates (`vertices`)
    #[default]
    Pixel,
    /// Coordinates relative to page size, in `[0, 1]` (`normalizedVertices`)
    Normalized,
}

/// A four-corner bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corners: upper-left, upper-right, lower-right, lower-left
    pub corners: [Point; 4],
    /// Coordinate set the corners came from
    pub space: CoordinateSpace,
}

impl Quad {
    /// Create a box from its four corners.
    pub fn new(corners: [Point; 4], space: CoordinateSpace) -> Self {
        Self { corners, space }
    }

    /// Create an axis-aligned pixel box from two opposite corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_oxide::geometry::Quad;
    ///
    /// let quad = Quad::from_points(10.0, 100.0, 60.0, 120.0);
    /// assert_eq!(quad.left(), 10.0);
    /// assert_eq!(quad.right(), 60.0);
    /// assert_eq!(quad.height(), 20.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            corners: [
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
            space: CoordinateSpace::Pixel,
        }
    }

    /// Upper-left corner.
    pub fn upper_left(&self) -> Point {
        self.corners[0]
    }

    /// Upper-right corner.
    pub fn upper_right(&self) -> Point {
        self.corners[1]
    }

    /// Lower-right corner.
    pub fn lower_right(&self) -> Point {
        self.corners[2]
    }

    /// Start x: the upper-left corner's x.
    pub fn left(&self) -> f32 {
        self.corners[0].x
    }

    /// End x: the upper-right corner's x.
    pub fn right(&self) -> f32 {
        self.corners[1].x
    }

    /// Upper y: the upper-left corner's y.
    pub fn top(&self) -> f32 {
        self.corners[0].y
    }

    /// Lower y: the lower-right corner's y.
    pub fn bottom(&self) -> f32 {
        self.corners[2].y
    }

    /// Width measured along the top edge.
    pub fn width(&self) -> f32 {
        self.right() - self.left()
    }

    /// Height: lower-right y minus upper-left y.
    pub fn height(&self) -> f32 {
        self.bottom() - self.top()
    }

    /// Vertical midpoint between the top and bottom edges.
    pub fn vertical_midpoint(&self) -> f32 {
        self.height() / 2.0 + self.top()
    }

    /// Whether this box straddles the horizontal line at `line_mid_y`.
    pub fn straddles(&self, line_mid_y: f32) -> bool {
        on_same_line(line_mid_y, self.bottom(), self.top())
    }

    /// Whether this box's horizontal extent overlaps the open interval `(left, right)`.
    ///
    /// The test compares the lower-right x against `left` and the upper-left x
    /// against `right`, so skewed boxes are judged by their outermost corners.
    pub fn overlaps_horizontally(&self, left: f32, right: f32) -> bool {
        self.lower_right().x > left && self.left() < right
    }

    /// Smallest axis-aligned box containing both boxes.
    ///
    /// The result keeps this box's coordinate space.
    pub fn union(&self, other: &Quad) -> Quad {
        let (mut x0, mut y0) = (f32::INFINITY, f32::INFINITY);
        let (mut x1, mut y1) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in self.corners.iter().chain(&other.corners) {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Quad {
            space: self.space,
            ..Quad::from_points(x0, y0, x1, y1)
        }
    }
}

/// Gap between the end of `current` and the start of `next`.
///
/// Negative when the boxes overlap horizontally.
pub fn horizontal_gap(current: &Quad, next: &Quad) -> f32 {
    next.left() - current.right()
}

/// Whether the gap after `current` is a structural break.
///
/// A gap at least as wide as the current word is tall marks a field or column
/// boundary rather than an ordinary space. Only `current`'s height is
/// consulted.
///
/// # Examples
///
/// ```
/// use field_oxide::geometry::{is_phrase_break, Quad};
///
/// let word = Quad::from_points(0.0, 0.0, 40.0, 10.0);
/// let near = Quad::from_points(45.0, 0.0, 80.0, 10.0);
/// let far = Quad::from_points(50.0, 0.0, 80.0, 10.0);
///
/// assert!(!is_phrase_break(&word, &near));
/// assert!(is_phrase_break(&word, &far));
/// ```
pub fn is_phrase_break(current: &Quad, next: &Quad) -> bool {
    is_phrase_break_scaled(current, next, 1.0)
}

/// Like [`is_phrase_break`] with the height threshold multiplied by `ratio`.
pub fn is_phrase_break_scaled(current: &Quad, next: &Quad, ratio: f32) -> bool {
    horizontal_gap(current, next) >= current.height() * ratio
}

/// Whether a box spanning `other_high_y..other_low_y` sits on the line whose
/// vertical midpoint is `line_mid_y`.
///
/// `other_low_y` is the box's lower edge (larger y) and `other_high_y` its
/// upper edge. Both comparisons are strict.
pub fn on_same_line(line_mid_y: f32, other_low_y: f32, other_high_y: f32) -> bool {
    other_low_y > line_mid_y && other_high_y < line_mid_y
}
