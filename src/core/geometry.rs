//! Window geometry and the numeric stream the window manager reports it in

use super::error::EngineError;

/// An absolute screen position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by a displacement
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Pixel rectangle of the authoritative target window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowBounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Center of the window, rounded towards the top-left.
    ///
    /// Not clamped to any screen: a window hanging off the display edge
    /// yields an off-screen center.
    pub fn center(&self) -> Point {
        Point {
            x: self.x.saturating_add((self.width / 2) as i32),
            y: self.y.saturating_add((self.height / 2) as i32),
        }
    }

    fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Clamp a point into the window, edges inclusive
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(self.x, self.right()),
            y: point.y.clamp(self.y, self.bottom()),
        }
    }
}

/// Parse the window manager's geometry report and pick the largest window.
///
/// The report lists every window position first and every size after it:
/// `x1, y1, x2, y2, ..., w1, h1, w2, h2, ...`. Any separators are accepted;
/// only the integers matter.
pub fn parse_geometry_report(raw: &str, keyword: &str) -> Result<WindowBounds, EngineError> {
    let numbers = extract_integers(raw).map_err(|_| EngineError::GeometryParse {
        raw: raw.to_string(),
    })?;

    if numbers.is_empty() {
        return Err(EngineError::TargetNotFound {
            keyword: keyword.to_string(),
        });
    }
    if numbers.len() % 4 != 0 {
        return Err(EngineError::GeometryParse {
            raw: raw.to_string(),
        });
    }

    let (positions, sizes) = numbers.split_at(numbers.len() / 2);

    let mut best: Option<WindowBounds> = None;
    for (pos, size) in positions.chunks_exact(2).zip(sizes.chunks_exact(2)) {
        let (Ok(width), Ok(height)) = (u32::try_from(size[0]), u32::try_from(size[1])) else {
            return Err(EngineError::GeometryParse {
                raw: raw.to_string(),
            });
        };
        let candidate = WindowBounds::new(pos[0], pos[1], width, height);
        if best.is_none_or(|b| candidate.area() > b.area()) {
            best = Some(candidate);
        }
    }

    best.ok_or_else(|| EngineError::GeometryParse {
        raw: raw.to_string(),
    })
}

/// Pull every signed decimal integer out of a string
fn extract_integers(raw: &str) -> Result<Vec<i32>, std::num::ParseIntError> {
    let mut numbers = Vec::new();
    let mut current = String::new();

    for c in raw.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else {
            if current.chars().any(|c| c.is_ascii_digit()) {
                numbers.push(current.parse()?);
            }
            current.clear();
            if c == '-' {
                current.push(c);
            }
        }
    }
    if current.chars().any(|c| c.is_ascii_digit()) {
        numbers.push(current.parse()?);
    }

    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_window_wins() {
        // windows (10,20) 100x200 and (110,120) 50x60
        let bounds = parse_geometry_report("10, 20, 110, 120, 100, 200, 50, 60", "app").unwrap();
        assert_eq!(bounds, WindowBounds::new(10, 20, 100, 200));
    }

    #[test]
    fn test_single_window() {
        let bounds = parse_geometry_report("0, 25, 1280, 720", "app").unwrap();
        assert_eq!(bounds, WindowBounds::new(0, 25, 1280, 720));
    }

    #[test]
    fn test_negative_positions_are_kept() {
        let bounds = parse_geometry_report("-1920, -40, 800, 600", "app").unwrap();
        assert_eq!(bounds, WindowBounds::new(-1920, -40, 800, 600));
    }

    #[test]
    fn test_equal_areas_keep_first_window() {
        let bounds = parse_geometry_report("1, 2, 3, 4, 10, 10, 10, 10", "app").unwrap();
        assert_eq!(bounds, WindowBounds::new(1, 2, 10, 10));
    }

    #[test]
    fn test_malformed_count_is_parse_error() {
        let err = parse_geometry_report("10, 20, 110, 120, 100, 200", "app").unwrap_err();
        match err {
            EngineError::GeometryParse { raw } => assert_eq!(raw, "10, 20, 110, 120, 100, 200"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_size_is_parse_error() {
        let err = parse_geometry_report("0, 0, -5, 10", "app").unwrap_err();
        assert!(matches!(err, EngineError::GeometryParse { .. }));
    }

    #[test]
    fn test_empty_report_is_not_found() {
        let err = parse_geometry_report("", "cluster").unwrap_err();
        assert!(matches!(err, EngineError::TargetNotFound { keyword } if keyword == "cluster"));
    }

    #[test]
    fn test_overflowing_number_is_parse_error() {
        let err = parse_geometry_report("0, 0, 99999999999, 10", "app").unwrap_err();
        assert!(matches!(err, EngineError::GeometryParse { .. }));
    }

    #[test]
    fn test_clamp_to_edges() {
        let bounds = WindowBounds::new(100, 50, 800, 600);
        assert_eq!(bounds.clamp(Point::new(5000, -300)), Point::new(900, 50));
        assert_eq!(bounds.clamp(Point::new(400, 300)), Point::new(400, 300));
    }

    #[test]
    fn test_center() {
        assert_eq!(WindowBounds::new(10, 20, 101, 51).center(), Point::new(60, 45));
    }
}
