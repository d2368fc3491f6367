use crate::error::{ApkwatchError, Result};
use jiff::civil::Date;
use regex::Regex;

/// The label the Play Store renders next to the last-updated date. The
/// surrounding markup carries no stable schema, so extraction scans for this
/// marker and takes the text of the element that follows it.
const UPDATED_ON_MARKER: &str = r">\s*Updated on\s*</div>\s*<div[^>]*>\s*([^<]+?)\s*<";

/// The one date format the listing has been observed to use, e.g. "Mar 15, 2024".
const LISTING_DATE_FORMAT: &str = "%b %d, %Y";

/// Extract the "Updated on" date from a listing page and normalize it into a
/// calendar date. Any page without the marker, and any marker whose text does
/// not parse as a date, is a parse failure; no fallback formats are guessed.
pub fn extract_last_updated(package_id: &str, html: &str) -> Result<Date> {
    let marker = Regex::new(UPDATED_ON_MARKER).map_err(|e| ApkwatchError::Parse {
        package_id: package_id.to_string(),
        reason: format!("invalid marker pattern: {e}"),
    })?;

    let raw = marker
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| ApkwatchError::Parse {
            package_id: package_id.to_string(),
            reason: "'Updated on' marker not found on listing page".to_string(),
        })?;

    Date::strptime(LISTING_DATE_FORMAT, raw).map_err(|e| ApkwatchError::Parse {
        package_id: package_id.to_string(),
        reason: format!("unrecognized date text '{raw}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    const LISTING_SNIPPET: &str = concat!(
        "<html><body><div class=\"hAyfc\">",
        "<div class=\"lXlx5\">Updated on</div>",
        "<div class=\"xg1aie\">Mar 15, 2024</div>",
        "</div></body></html>"
    );

    #[test]
    fn extracts_date_next_to_marker() {
        let extracted = extract_last_updated("com.example.app", LISTING_SNIPPET).unwrap();
        assert_eq!(extracted, date(2024, 3, 15));
    }

    #[test]
    fn tolerates_whitespace_around_marker() {
        let html = "<div>\n  Updated on  </div>\n<div class=\"x\">\n  Aug 9, 2023 </div>";
        let extracted = extract_last_updated("com.example.app", html).unwrap();
        assert_eq!(extracted, date(2023, 8, 9));
    }

    #[test]
    fn missing_marker_is_a_parse_error() {
        let err = extract_last_updated("com.example.app", "<html><body/></html>").unwrap_err();
        match err {
            ApkwatchError::Parse { package_id, reason } => {
                assert_eq!(package_id, "com.example.app");
                assert!(reason.contains("marker not found"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_date_is_a_parse_error_not_a_guess() {
        let html = "<div>Updated on</div><div>15 March 2024</div>";
        let err = extract_last_updated("com.example.app", html).unwrap_err();
        assert!(matches!(err, ApkwatchError::Parse { .. }));
    }
}
