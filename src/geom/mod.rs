mod core;

pub use self::core::{
    INTERSECTION_EPS, Line2, Point2, Vec2, perpendicular_foot, perpendicular_through,
};
