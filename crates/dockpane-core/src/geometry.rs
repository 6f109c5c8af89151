//! Screen-space primitives shared by the shell logic and the app
//!
//! All coordinates are logical pixels. Monitors carry both their full bounds
//! and their work area (bounds minus docks/taskbars); the two may be equal on
//! platforms that do not report a work area.

use serde::{Deserialize, Serialize};

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A size in logical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total area in pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// An axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn area(&self) -> u64 {
        self.size().area()
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Area of the intersection with `other`, zero when disjoint
    pub fn intersection_area(&self, other: &Rect) -> u64 {
        let left = (self.x as i64).max(other.x as i64);
        let right = self.right().min(other.right());
        let top = (self.y as i64).max(other.y as i64);
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            ((right - left) * (bottom - top)) as u64
        } else {
            0
        }
    }

    /// Top-left corner that centers a window of `size` within this rect
    pub fn centered_origin(&self, size: Size) -> Point {
        let x = self.x as i64 + (self.width as i64 - size.width as i64) / 2;
        let y = self.y as i64 + (self.height as i64 - size.height as i64) / 2;
        Point::new(x as i32, y as i32)
    }
}

/// A monitor as seen by the placement logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    /// Full monitor bounds
    pub bounds: Rect,
    /// Bounds minus docks and taskbars
    pub work_area: Rect,
}

impl Monitor {
    pub fn new(bounds: Rect, work_area: Rect) -> Self {
        Self { bounds, work_area }
    }

    /// Monitor whose work area equals its bounds
    pub fn from_bounds(bounds: Rect) -> Self {
        Self {
            bounds,
            work_area: bounds,
        }
    }
}

/// Named window-size options
///
/// The fixed presets map to constant pixel sizes; `Sidebar` is resolved
/// against the current monitor every time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Small,
    Medium,
    Large,
    Sidebar,
}

impl SizePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizePreset::Small => "small",
            SizePreset::Medium => "medium",
            SizePreset::Large => "large",
            SizePreset::Sidebar => "sidebar",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "small" => Some(SizePreset::Small),
            "medium" => Some(SizePreset::Medium),
            "large" => Some(SizePreset::Large),
            "sidebar" => Some(SizePreset::Sidebar),
            _ => None,
        }
    }

    /// Resolve the preset to a concrete size against `monitor`
    ///
    /// This is the single point where the dynamic sidebar preset is computed:
    /// one third of the work-area width, full work-area height.
    pub fn resolve(&self, monitor: &Monitor) -> Size {
        match self {
            SizePreset::Small => Size::new(1000, 600),
            SizePreset::Medium => Size::new(1250, 750),
            SizePreset::Large => Size::new(1500, 900),
            SizePreset::Sidebar => Size::new(
                monitor.work_area.width / 3,
                monitor.work_area.height,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor_1080p() -> Monitor {
        Monitor::from_bounds(Rect::new(0, 0, 1920, 1080))
    }

    #[test]
    fn test_intersection_area_disjoint() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(200, 200, 100, 100);
        assert_eq!(a.intersection_area(&b), 0);
    }

    #[test]
    fn test_intersection_area_partial() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersection_area(&b), 50 * 50);
    }

    #[test]
    fn test_intersection_area_negative_origin() {
        let a = Rect::new(-50, -50, 100, 100);
        let b = Rect::new(0, 0, 100, 100);
        assert_eq!(a.intersection_area(&b), 50 * 50);
    }

    #[test]
    fn test_centered_origin() {
        let monitor = monitor_1080p();
        let origin = monitor.bounds.centered_origin(Size::new(1000, 600));
        assert_eq!(origin, Point::new(460, 240));
    }

    #[test]
    fn test_fixed_presets_ignore_monitor() {
        let monitor = monitor_1080p();
        assert_eq!(SizePreset::Small.resolve(&monitor), Size::new(1000, 600));
        assert_eq!(SizePreset::Medium.resolve(&monitor), Size::new(1250, 750));
        assert_eq!(SizePreset::Large.resolve(&monitor), Size::new(1500, 900));
    }

    #[test]
    fn test_sidebar_resolves_from_work_area() {
        let monitor = Monitor::new(
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 25, 1920, 1055),
        );
        let size = SizePreset::Sidebar.resolve(&monitor);
        assert_eq!(size, Size::new(640, 1055));
    }

    #[test]
    fn test_sidebar_width_floors() {
        let monitor = Monitor::from_bounds(Rect::new(0, 0, 2560, 1440));
        assert_eq!(SizePreset::Sidebar.resolve(&monitor).width, 853);
    }

    #[test]
    fn test_preset_key_round_trip() {
        for preset in [
            SizePreset::Small,
            SizePreset::Medium,
            SizePreset::Large,
            SizePreset::Sidebar,
        ] {
            assert_eq!(SizePreset::from_key(preset.as_str()), Some(preset));
        }
        assert_eq!(SizePreset::from_key("gigantic"), None);
    }
}
