//! Pure calculation functions for rotation geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Number of clockwise quarter turns for `degrees`, if it is a multiple of 90.
///
/// # Examples
/// ```
/// # use stylecam::imaging::quarter_turns;
/// assert_eq!(quarter_turns(90), Some(1));
/// assert_eq!(quarter_turns(-90), Some(3));
/// assert_eq!(quarter_turns(720), Some(0));
/// assert_eq!(quarter_turns(45), None);
/// ```
pub fn quarter_turns(degrees: i32) -> Option<u8> {
    if degrees % 90 != 0 {
        return None;
    }
    Some((degrees / 90).rem_euclid(4) as u8)
}

/// Canvas size needed to hold a `width`x`height` image rotated by `degrees`.
///
/// Quarter turns are exact (a swap or no change). Other angles use the
/// rotated bounding box, rounded up so no source pixel is clipped.
///
/// # Examples
/// ```
/// # use stylecam::imaging::rotated_dimensions;
/// assert_eq!(rotated_dimensions(400, 300, 90), (300, 400));
/// assert_eq!(rotated_dimensions(400, 300, 180), (400, 300));
/// assert_eq!(rotated_dimensions(100, 100, 45), (142, 142));
/// ```
pub fn rotated_dimensions(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    match quarter_turns(degrees) {
        Some(0) | Some(2) => (width, height),
        Some(_) => (height, width),
        None => {
            let theta = (degrees as f64).to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let (w, h) = (width as f64, height as f64);
            let new_w = (w * cos + h * sin - 1e-9).ceil().max(1.0);
            let new_h = (w * sin + h * cos - 1e-9).ceil().max(1.0);
            (new_w as u32, new_h as u32)
        }
    }
}
