use std::ops::{Add, AddAssign, Sub, Mul, Neg};
use serde::{Serialize, Deserialize};

/// 3D vector for positions, rotations (Euler XYZ) and colors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length of the (x, y) projection, ignoring depth
    pub fn planar_length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self.scale(1.0 / len)
        } else {
            *self
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn scale(&self, s: f32) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Convert to array for WebGL
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Parse a `#rrggbb` hex string into linear 0..1 components
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(digits.get(range)?, 16)
                .ok()
                .map(|c| c as f32 / 255.0)
        };
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        self.scale(scalar)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_length_ignores_depth() {
        let v = Vec3::new(3.0, 4.0, 100.0);
        assert!((v.planar_length() - 5.0).abs() < 0.0001);
        assert!(v.length() > 100.0);
    }

    #[test]
    fn test_normalize_zero_is_stable() {
        let n = Vec3::ZERO.normalize();
        assert_eq!(n, Vec3::ZERO);

        let n = Vec3::new(3.0, 4.0, 0.0).normalize();
        assert!((n.length() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cross() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let c = x.cross(&Vec3::UP);
        assert!((c.z - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_from_hex() {
        let c = Vec3::from_hex("#a855f7").unwrap();
        assert!((c.x - 168.0 / 255.0).abs() < 0.0001);
        assert!((c.y - 85.0 / 255.0).abs() < 0.0001);
        assert!((c.z - 247.0 / 255.0).abs() < 0.0001);

        assert!(Vec3::from_hex("ec4899").is_some());
        assert!(Vec3::from_hex("#fff").is_none());
        assert!(Vec3::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_ops() {
        let mut a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::splat(1.0);
        assert_eq!((a + b).x, 2.0);
        assert_eq!((a - b).z, 2.0);
        assert_eq!((a * 2.0).y, 4.0);
        assert_eq!((-a).x, -1.0);
        a += b;
        assert_eq!(a, Vec3::new(2.0, 3.0, 4.0));
    }
}
