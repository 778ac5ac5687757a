use crate::bls::error::ImportError;

/// City and state abbreviation parsed from an AREA_TITLE such as
/// `"Scranton, PA-NJ"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaParts {
    pub city: String,
    pub state: String,
}

/// Splits a combined `"City, ST"` label. The city is the first comma part;
/// the state is the last part cut at its first hyphen, so multi-state metro
/// labels keep only the primary state. Titles with fewer than two parts are
/// rejected.
pub fn parse_area_title(area_title: &str) -> Result<AreaParts, ImportError> {
    let parts: Vec<&str> = area_title.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return Err(ImportError::UnparseableArea(area_title.to_string()));
    }

    let city = parts[0];
    let state = parts[parts.len() - 1]
        .split('-')
        .next()
        .unwrap_or_default()
        .trim();

    if city.is_empty() || state.is_empty() {
        return Err(ImportError::UnparseableArea(area_title.to_string()));
    }

    Ok(AreaParts {
        city: city.to_string(),
        state: state.to_string(),
    })
}

const STATE_NAMES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("GU", "Guam"),
    ("VI", "Virgin Islands"),
];

/// Full state name for a USPS abbreviation (case-insensitive).
pub fn state_name(abbr: &str) -> Option<&'static str> {
    STATE_NAMES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(abbr))
        .map(|&(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_city() {
        assert_eq!(
            parse_area_title("San Francisco, CA").unwrap(),
            AreaParts {
                city: "San Francisco".into(),
                state: "CA".into()
            }
        );
    }

    #[test]
    fn test_multi_state_metro_keeps_first_state() {
        assert_eq!(
            parse_area_title("Scranton, PA-NJ").unwrap(),
            AreaParts {
                city: "Scranton".into(),
                state: "PA".into()
            }
        );
        let parts = parse_area_title("Chicago-Naperville-Elgin, IL-IN-WI").unwrap();
        assert_eq!(parts.city, "Chicago-Naperville-Elgin");
        assert_eq!(parts.state, "IL");
    }

    #[test]
    fn test_single_token_is_rejected() {
        assert!(matches!(
            parse_area_title("U.S."),
            Err(ImportError::UnparseableArea(_))
        ));
        assert!(parse_area_title("California").is_err());
    }

    #[test]
    fn test_blank_parts_are_rejected() {
        assert!(parse_area_title(", CA").is_err());
        assert!(parse_area_title("Springfield, ").is_err());
    }

    #[test]
    fn test_state_name_lookup() {
        assert_eq!(state_name("CA"), Some("California"));
        assert_eq!(state_name("tx"), Some("Texas"));
        assert_eq!(state_name("ZZ"), None);
    }
}
