//! Polar shape functions that bend the radial search into a silhouette.
//!
//! Every shape maps an angle `theta` (radians) to a radius multiplier. `Circle` is kept as a
//! sentinel so the point generator can skip the per-sample call.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied polar function `theta -> radius multiplier`.
pub type ShapeFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Built-in silhouettes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinShape {
    /// Identity multiplier.
    Circle,
    /// `1 - sin(theta)`.
    Cardioid,
    /// Square rotated by 45 degrees.
    Diamond,
    /// Axis-aligned square.
    Square,
    /// Triangle with a vertex pointing right.
    TriangleForward,
    /// Triangle with a vertex pointing up.
    TriangleUpright,
    /// Regular pentagon.
    Pentagon,
    /// Five-pointed star.
    Star,
}

impl BuiltinShape {
    /// Every built-in shape, in registry order.
    pub const ALL: [BuiltinShape; 8] = [
        BuiltinShape::Circle,
        BuiltinShape::Cardioid,
        BuiltinShape::Diamond,
        BuiltinShape::Square,
        BuiltinShape::TriangleForward,
        BuiltinShape::TriangleUpright,
        BuiltinShape::Pentagon,
        BuiltinShape::Star,
    ];

    /// Look up a shape by name. `"triangle"` is an alias of `"triangle-upright"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "circle" => Self::Circle,
            "cardioid" => Self::Cardioid,
            "diamond" => Self::Diamond,
            "square" => Self::Square,
            "triangle-forward" => Self::TriangleForward,
            "triangle" | "triangle-upright" => Self::TriangleUpright,
            "pentagon" => Self::Pentagon,
            "star" => Self::Star,
            _ => return None,
        })
    }

    /// Canonical registry name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Cardioid => "cardioid",
            Self::Diamond => "diamond",
            Self::Square => "square",
            Self::TriangleForward => "triangle-forward",
            Self::TriangleUpright => "triangle-upright",
            Self::Pentagon => "pentagon",
            Self::Star => "star",
        }
    }

    /// Radius multiplier at `theta`.
    pub fn radius_at(self, theta: f64) -> f64 {
        match self {
            Self::Circle => 1.0,
            Self::Cardioid => 1.0 - theta.sin(),
            Self::Diamond => {
                let t = theta % (2.0 * PI / 4.0);
                1.0 / (t.cos() + t.sin())
            }
            Self::Square => (1.0 / theta.cos().abs()).min(1.0 / theta.sin().abs()),
            Self::TriangleForward => {
                let t = theta % (2.0 * PI / 3.0);
                1.0 / (t.cos() + 3f64.sqrt() * t.sin())
            }
            Self::TriangleUpright => {
                let t = (theta + PI * 3.0 / 2.0) % (2.0 * PI / 3.0);
                1.0 / (t.cos() + 3f64.sqrt() * t.sin())
            }
            Self::Pentagon => {
                let t = (theta + 0.955) % (2.0 * PI / 5.0);
                1.0 / (t.cos() + 0.726543 * t.sin())
            }
            Self::Star => {
                let slice = 2.0 * PI / 10.0;
                let t = (theta + 0.955) % slice;
                if (theta + 0.955) % (2.0 * PI / 5.0) - slice >= 0.0 {
                    1.0 / ((slice - t).cos() + 3.07768 * (slice - t).sin())
                } else {
                    1.0 / (t.cos() + 3.07768 * t.sin())
                }
            }
        }
    }
}

/// Resolved search silhouette.
#[derive(Clone)]
pub enum Shape {
    /// A named shape from the registry.
    Builtin(BuiltinShape),
    /// A caller-supplied polar function.
    Custom(ShapeFn),
}

impl Shape {
    /// Resolve a registry name. Unknown names fall back to the circle.
    pub fn from_name(name: &str) -> Self {
        match BuiltinShape::from_name(name) {
            Some(shape) => Self::Builtin(shape),
            None => {
                tracing::warn!(shape = name, "unknown shape name, using circle");
                Self::Builtin(BuiltinShape::Circle)
            }
        }
    }

    /// Wrap a custom polar function.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// `true` for the identity shape, which needs no per-sample evaluation.
    pub fn is_circle(&self) -> bool {
        matches!(self, Self::Builtin(BuiltinShape::Circle))
    }

    /// Radius multiplier at `theta`.
    pub fn radius_at(&self, theta: f64) -> f64 {
        match self {
            Self::Builtin(b) => b.radius_at(theta),
            Self::Custom(f) => f(theta),
        }
    }

    /// Identity used to decide when cached radial points are stale.
    pub(crate) fn cache_key(&self) -> ShapeKey {
        match self {
            Self::Builtin(b) => ShapeKey::Builtin(*b),
            Self::Custom(f) => ShapeKey::Custom(Arc::as_ptr(f) as *const () as usize),
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::Builtin(BuiltinShape::Circle)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ShapeKey {
    Builtin(BuiltinShape),
    Custom(usize),
}

#[cfg(test)]
#[path = "../../tests/unit/layout/shape.rs"]
mod tests;
