use thiserror::Error;

/// Number of decimal places converted coordinates are rounded to. Polyline merging compares
/// endpoints with exact equality, so every conversion of the same string must land on the same f64.
pub const DECIMAL_PLACES: i32 = 8;

/// Shortest accepted input: two degree digits, minutes, seconds and the direction letter.
const MIN_LENGTH: usize = 7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("coordinate '{0}' is shorter than 7 characters")]
    TooShort(String),
    #[error("coordinate '{0}' does not end with one of N, S, E or W")]
    BadDirection(String),
    #[error("coordinate '{raw}' has a non-numeric {field} field")]
    NonNumeric { raw: String, field: &'static str },
    #[error("coordinate '{0}' matches neither the latitude nor the longitude layout")]
    UnknownLayout(String),
    #[error("coordinate '{raw}' has {minutes} minutes, expected [0, 60)")]
    MinutesOutOfRange { raw: String, minutes: u32 },
    #[error("coordinate '{raw}' has {seconds} seconds, expected [0, 60)")]
    SecondsOutOfRange { raw: String, seconds: f64 },
}

impl CoordinateError {
    /// The input string that failed to convert.
    pub fn raw(&self) -> &str {
        match self {
            CoordinateError::TooShort(raw)
            | CoordinateError::BadDirection(raw)
            | CoordinateError::UnknownLayout(raw) => raw,
            CoordinateError::NonNumeric { raw, .. }
            | CoordinateError::MinutesOutOfRange { raw, .. }
            | CoordinateError::SecondsOutOfRange { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            'E' => Some(Hemisphere::East),
            'W' => Some(Hemisphere::West),
            _ => None,
        }
    }

    fn sign(&self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }

    fn is_latitude(&self) -> bool {
        matches!(self, Hemisphere::North | Hemisphere::South)
    }
}

/// Width of the leading degree field: 2 digits for latitudes, 3 for longitudes.
///
/// With an explicit decimal point the integral part is exactly degrees, minutes and seconds, so
/// its length decides. Without one, the total length decides; at 8 and 9 characters a latitude
/// with fractional seconds and a longitude look alike, and the direction letter breaks the tie.
fn degree_width(
    raw: &str,
    integral: &str,
    has_point: bool,
    hemisphere: Hemisphere,
) -> Option<usize> {
    if has_point {
        return match integral.len() {
            6 => Some(2),
            7 => Some(3),
            _ => None,
        };
    }
    match raw.len() {
        7 => Some(2),
        8 | 9 if hemisphere.is_latitude() => Some(2),
        _ => Some(3),
    }
}

fn parse_field(raw: &str, digits: &str, field: &'static str) -> Result<u32, CoordinateError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoordinateError::NonNumeric {
            raw: raw.to_string(),
            field,
        });
    }
    digits.parse().map_err(|_| CoordinateError::NonNumeric {
        raw: raw.to_string(),
        field,
    })
}

/// Digits after the whole seconds are read as the decimal places of the seconds, so a suffix of
/// "5" is half a second.
fn parse_fraction(raw: &str, digits: &str) -> Result<f64, CoordinateError> {
    if digits.is_empty() {
        return Ok(0.0);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoordinateError::NonNumeric {
            raw: raw.to_string(),
            field: "fractional seconds",
        });
    }
    format!("0.{digits}")
        .parse()
        .map_err(|_| CoordinateError::NonNumeric {
            raw: raw.to_string(),
            field: "fractional seconds",
        })
}

fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(DECIMAL_PLACES);
    (value * scale).round() / scale
}

/// Convert a fixed-width sexagesimal coordinate into signed decimal degrees.
///
/// The input is `DD[D]MMSS[fraction]H`, where `H` is one of N, S, E or W. Latitudes carry two
/// degree digits and longitudes three. The fractional seconds may be written directly after the
/// seconds or after a decimal point, e.g. `4212472N` and `421247.2N` are the same latitude.
///
/// # Returns
/// Degrees rounded to [`DECIMAL_PLACES`], negative for S and W.
pub fn dms_to_decimal(raw: &str) -> Result<f64, CoordinateError> {
    if raw.len() < MIN_LENGTH {
        return Err(CoordinateError::TooShort(raw.to_string()));
    }
    let hemisphere = raw
        .chars()
        .last()
        .and_then(Hemisphere::from_char)
        .ok_or_else(|| CoordinateError::BadDirection(raw.to_string()))?;

    // The direction letter is ASCII, so this slice is on a char boundary.
    let body = &raw[..raw.len() - 1];
    if !body.is_ascii() {
        return Err(CoordinateError::NonNumeric {
            raw: raw.to_string(),
            field: "degrees",
        });
    }
    let (integral, point_fraction) = match body.split_once('.') {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (body, None),
    };

    let width = degree_width(raw, integral, point_fraction.is_some(), hemisphere)
        .ok_or_else(|| CoordinateError::UnknownLayout(raw.to_string()))?;
    if integral.len() < width + 4 {
        return Err(CoordinateError::UnknownLayout(raw.to_string()));
    }

    let degrees = parse_field(raw, &integral[..width], "degrees")?;
    let minutes = parse_field(raw, &integral[width..width + 2], "minutes")?;
    let seconds = parse_field(raw, &integral[width + 2..width + 4], "seconds")?;
    let fraction = match point_fraction {
        Some(fraction) => parse_fraction(raw, fraction)?,
        None => parse_fraction(raw, &integral[width + 4..])?,
    };

    if minutes >= 60 {
        return Err(CoordinateError::MinutesOutOfRange {
            raw: raw.to_string(),
            minutes,
        });
    }
    let seconds = seconds as f64 + fraction;
    if !(0.0..60.0).contains(&seconds) {
        return Err(CoordinateError::SecondsOutOfRange {
            raw: raw.to_string(),
            seconds,
        });
    }

    let value = degrees as f64 + minutes as f64 / 60.0 + seconds / 3600.0;
    Ok(round_to_precision(value * hemisphere.sign()))
}

/// Convert a latitude/longitude string pair into a coordinate with `x` = longitude and
/// `y` = latitude.
pub fn position_from_dms(latitude: &str, longitude: &str) -> Result<geo::Coord, CoordinateError> {
    Ok(geo::Coord {
        x: dms_to_decimal(longitude)?,
        y: dms_to_decimal(latitude)?,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::{dms_to_decimal, position_from_dms, CoordinateError};

    fn reference(degrees: f64, minutes: f64, seconds: f64, sign: f64) -> f64 {
        sign * (degrees + minutes / 60.0 + seconds / 3600.0)
    }

    #[rstest]
    #[case("421247N", reference(42.0, 12.0, 47.0, 1.0))]
    #[case("4212475N", reference(42.0, 12.0, 47.5, 1.0))]
    #[case("42124729S", reference(42.0, 12.0, 47.29, -1.0))]
    #[case("421247.29N", reference(42.0, 12.0, 47.29, 1.0))]
    #[case("421300.00N", reference(42.0, 13.0, 0.0, 1.0))]
    #[case("0831234W", reference(83.0, 12.0, 34.0, -1.0))]
    #[case("08312345W", reference(83.0, 12.0, 34.5, -1.0))]
    #[case("083123456E", reference(83.0, 12.0, 34.56, 1.0))]
    #[case("0831234.56W", reference(83.0, 12.0, 34.56, -1.0))]
    #[case("1794559.999E", reference(179.0, 45.0, 59.999, 1.0))]
    fn test_dms_to_decimal(#[case] raw: &str, #[case] expected: f64) {
        let value = dms_to_decimal(raw).unwrap();
        assert_abs_diff_eq!(value, expected, epsilon = 5e-9);
    }

    #[test]
    fn test_fraction_suffix_is_decimal_places_not_seconds() {
        // "5" after the seconds is half a second, not five more seconds.
        let half = dms_to_decimal("4212475N").unwrap();
        let whole = dms_to_decimal("421247N").unwrap();
        assert_abs_diff_eq!(half - whole, 0.5 / 3600.0, epsilon = 1e-8);
    }

    #[test]
    fn test_conversion_is_reproducible() {
        let first = dms_to_decimal("42124729N").unwrap();
        let second = dms_to_decimal("42124729N").unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_rounded_to_eight_places() {
        let value = dms_to_decimal("421247.29N").unwrap();
        assert_eq!(value, 42.21313611);
    }

    #[rstest]
    #[case("")]
    #[case("4212N")]
    #[case("421247")]
    fn test_too_short(#[case] raw: &str) {
        assert!(matches!(
            dms_to_decimal(raw),
            Err(CoordinateError::TooShort(_))
        ));
    }

    #[rstest]
    #[case("4212470X")]
    #[case("4212470n")]
    #[case("42124700")]
    fn test_bad_direction(#[case] raw: &str) {
        assert!(matches!(
            dms_to_decimal(raw),
            Err(CoordinateError::BadDirection(_))
        ));
    }

    #[rstest]
    #[case("4A1247N")]
    #[case("42+247N")]
    #[case("421247.2xN")]
    #[case("42é247N")]
    fn test_non_numeric(#[case] raw: &str) {
        assert!(matches!(
            dms_to_decimal(raw),
            Err(CoordinateError::NonNumeric { .. })
        ));
    }

    #[rstest]
    #[case("426047N")]
    #[case("0836034W")]
    fn test_minutes_out_of_range(#[case] raw: &str) {
        assert!(matches!(
            dms_to_decimal(raw),
            Err(CoordinateError::MinutesOutOfRange { minutes: 60, .. })
        ));
    }

    #[rstest]
    #[case("421260N")]
    #[case("4212609N")]
    #[case("0831260.5W")]
    fn test_seconds_out_of_range(#[case] raw: &str) {
        assert!(matches!(
            dms_to_decimal(raw),
            Err(CoordinateError::SecondsOutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_layout_with_decimal_point() {
        assert!(matches!(
            dms_to_decimal("42124.29N"),
            Err(CoordinateError::UnknownLayout(_))
        ));
    }

    #[test]
    fn test_error_reports_raw_string() {
        let err = dms_to_decimal("421260N").unwrap_err();
        assert_eq!(err.raw(), "421260N");
    }

    #[test]
    fn test_position_from_dms_is_lon_lat() {
        let coord = position_from_dms("421247.29N", "0831234.00W").unwrap();
        assert_eq!(coord.y, 42.21313611);
        assert_abs_diff_eq!(coord.x, -83.20944444, epsilon = 1e-8);
    }
}
