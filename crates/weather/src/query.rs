//! Location queries accepted by the weather routes.

use outly_core::Error;

/// Where to look up weather: coordinates or a free-text place name.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    Named(String),
}

impl LocationQuery {
    /// Build a query from raw request parameters.
    ///
    /// Coordinates win when both `lat` and `lon` are present; otherwise a
    /// non-blank `location` is used. Anything else is a validation error.
    pub fn from_params(
        location: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<Self, Error> {
        let lat = lat.map(str::trim).filter(|s| !s.is_empty());
        let lon = lon.map(str::trim).filter(|s| !s.is_empty());

        if let (Some(lat), Some(lon)) = (lat, lon) {
            let lat: f64 = lat
                .parse()
                .map_err(|_| Error::Validation(format!("Invalid latitude '{lat}'")))?;
            let lon: f64 = lon
                .parse()
                .map_err(|_| Error::Validation(format!("Invalid longitude '{lon}'")))?;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(Error::Validation("Coordinates out of range".into()));
            }
            return Ok(Self::Coordinates { lat, lon });
        }

        match location.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => Ok(Self::Named(name.to_string())),
            None => Err(Error::Validation("Location parameters missing".into())),
        }
    }

    /// Query-string pairs identifying the location for the provider.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Coordinates { lat, lon } => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
            Self::Named(name) => vec![("q", name.clone())],
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coordinates { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_take_precedence() {
        let q = LocationQuery::from_params(Some("Tokyo"), Some("35.68"), Some("139.69")).unwrap();
        assert_eq!(q, LocationQuery::Coordinates { lat: 35.68, lon: 139.69 });
    }

    #[test]
    fn lone_latitude_falls_back_to_name() {
        let q = LocationQuery::from_params(Some("Osaka"), Some("34.6"), None).unwrap();
        assert_eq!(q, LocationQuery::Named("Osaka".into()));
    }

    #[test]
    fn nothing_usable_is_validation_error() {
        let err = LocationQuery::from_params(Some("  "), None, Some("1.0")).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == "Location parameters missing"));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(LocationQuery::from_params(None, Some("north"), Some("1")).is_err());
        assert!(LocationQuery::from_params(None, Some("91"), Some("1")).is_err());
    }

    #[test]
    fn query_pairs() {
        let named = LocationQuery::Named("São Paulo".into());
        assert_eq!(named.to_query_pairs(), vec![("q", "São Paulo".to_string())]);

        let coords = LocationQuery::Coordinates { lat: 1.5, lon: -2.0 };
        assert_eq!(
            coords.to_query_pairs(),
            vec![("lat", "1.5".to_string()), ("lon", "-2".to_string())]
        );
    }
}
