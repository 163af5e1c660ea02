/// Validate latitude and longitude coordinates
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if lat < -90.0 || lat > 90.0 {
        return Err(format!(
            "Invalid latitude: {}. Must be between -90 and 90",
            lat
        ));
    }
    if lon < -180.0 || lon > 180.0 {
        return Err(format!(
            "Invalid longitude: {}. Must be between -180 and 180",
            lon
        ));
    }
    Ok(())
}

/// Parse timezone string and validate
pub fn parse_timezone(tz_str: &str) -> Result<chrono_tz::Tz, String> {
    tz_str
        .parse::<chrono_tz::Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}
