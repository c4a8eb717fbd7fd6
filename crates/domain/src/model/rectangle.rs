//! A small value object used to exercise object persistence.

use serde::{Deserialize, Serialize};

/// Width and height; the area is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Rectangle {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `width * height`.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area() {
        assert_eq!(Rectangle::new(18, 78).area(), 1404);
    }

    #[test]
    fn test_area_does_not_overflow() {
        assert_eq!(Rectangle::new(u32::MAX, 2).area(), u64::from(u32::MAX) * 2);
    }
}
