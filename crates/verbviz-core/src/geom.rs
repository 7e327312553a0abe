#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;
pub type Box2D = euclid::Box2D<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    euclid::rect(x, y, w, h)
}

/// Smallest rectangle containing every point, or `None` for an empty iterator.
pub fn bounds_of<I>(points: I) -> Option<Rect>
where
    I: IntoIterator<Item = Point>,
{
    let mut it = points.into_iter();
    let first = it.next()?;
    let mut min = first;
    let mut max = first;
    for p in it {
        min = min.min(p);
        max = max.max(p);
    }
    Some(Box2D::new(min, max).to_rect())
}
