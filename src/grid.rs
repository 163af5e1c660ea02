use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI};

// KMA Lambert Conformal Conic (DFS) projection parameters
const EARTH_RADIUS_KM: f64 = 6371.00877;
const GRID_SPACING_KM: f64 = 5.0;
const STANDARD_PARALLEL_1_DEG: f64 = 30.0;
const STANDARD_PARALLEL_2_DEG: f64 = 60.0;
const ORIGIN_LON_DEG: f64 = 126.0;
const ORIGIN_LAT_DEG: f64 = 38.0;
const ORIGIN_X: f64 = 43.0;
const ORIGIN_Y: f64 = 136.0;

/// A cell on the KMA observation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub nx: i32,
    pub ny: i32,
}

/// Project geographic coordinates onto the KMA nowcast grid.
///
/// Pure arithmetic: the same (lat, lon) always yields the same cell.
/// Coordinates far outside Korea still project, they just land outside the
/// serviced grid range.
pub fn lat_lon_to_grid(lat: f64, lon: f64) -> GridCell {
    let re = EARTH_RADIUS_KM / GRID_SPACING_KM;
    let slat1 = STANDARD_PARALLEL_1_DEG.to_radians();
    let slat2 = STANDARD_PARALLEL_2_DEG.to_radians();
    let olon = ORIGIN_LON_DEG.to_radians();
    let olat = ORIGIN_LAT_DEG.to_radians();

    // Cone constant and scale factor from the two standard parallels
    let sn = (slat1.cos() / slat2.cos()).ln()
        / ((FRAC_PI_4 + slat2 * 0.5).tan() / (FRAC_PI_4 + slat1 * 0.5).tan()).ln();
    let sf = (FRAC_PI_4 + slat1 * 0.5).tan().powf(sn) * slat1.cos() / sn;
    let ro = re * sf / (FRAC_PI_4 + olat * 0.5).tan().powf(sn);

    let ra = re * sf / (FRAC_PI_4 + lat.to_radians() * 0.5).tan().powf(sn);
    let mut theta = lon.to_radians() - olon;
    if theta > PI {
        theta -= 2.0 * PI;
    }
    if theta < -PI {
        theta += 2.0 * PI;
    }
    theta *= sn;

    // Round half-up, matching the published DFS conversion
    GridCell {
        nx: (ra * theta.sin() + ORIGIN_X + 0.5).floor() as i32,
        ny: (ro - ra * theta.cos() + ORIGIN_Y + 0.5).floor() as i32,
    }
}
