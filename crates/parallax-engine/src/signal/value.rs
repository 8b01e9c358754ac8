use crate::coords::{Vec2, Vec3};
use crate::paint::Color;

/// Shape of a value flowing through signals and derived properties.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Scalar,
    Vec2,
    Vec3,
    Color,
}

/// A signal or derived-property value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Color(Color),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Color(_) => ValueKind::Color,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Value::Scalar(v) => v.is_finite(),
            Value::Vec2(v) => v.is_finite(),
            Value::Vec3(v) => v.is_finite(),
            Value::Color(c) => c.is_finite(),
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<f32> {
        match *self {
            Value::Scalar(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            Value::Vec2(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            Value::Vec3(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_color(&self) -> Option<Color> {
        match *self {
            Value::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vec2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}
