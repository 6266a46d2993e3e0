use super::address::resolve_display_address;
use super::domain::{Geo, QuoteSubmission};
use super::service::QuoteError;

/// Keeps only ASCII digits, so `01310-100` becomes `01310100`.
pub fn normalize_postal_code(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Structured pickup CEP first, then the legacy top-level `cep`.
pub fn resolve_pickup_postal_code(submission: &QuoteSubmission) -> String {
    let raw = submission
        .pickup
        .postal_code
        .as_deref()
        .or(submission.legacy_postal_code.as_deref())
        .unwrap_or_default();
    normalize_postal_code(raw)
}

pub fn resolve_delivery_postal_code(submission: &QuoteSubmission) -> String {
    normalize_postal_code(submission.delivery.postal_code.as_deref().unwrap_or_default())
}

/// Structured pickup reading first, then the legacy `geo` field.
pub fn resolve_geo(submission: &QuoteSubmission) -> Option<&Geo> {
    submission
        .pickup_geo
        .as_ref()
        .or(submission.legacy_geo.as_ref())
}

/// A submission that passed validation, with its derived display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuote {
    pub submission: QuoteSubmission,
    pub requester_name: String,
    pub requester_email: String,
    pub pickup_postal_code: String,
    /// Empty when the delivery CEP was not informed.
    pub delivery_postal_code: String,
    pub pickup_display: String,
    pub delivery_display: String,
    pub geo: Option<Geo>,
}

impl ValidatedQuote {
    pub fn code(&self) -> Option<&str> {
        self.submission.code.as_deref()
    }

    pub fn delivery_postal_code(&self) -> Option<&str> {
        Some(self.delivery_postal_code.as_str()).filter(|code| !code.is_empty())
    }
}

pub fn validate(submission: QuoteSubmission) -> Result<ValidatedQuote, QuoteError> {
    let pickup_postal_code = resolve_pickup_postal_code(&submission);
    let delivery_postal_code = resolve_delivery_postal_code(&submission);

    let (Some(requester_name), Some(requester_email)) = (
        submission.requester_name.clone(),
        submission.requester_email.clone(),
    ) else {
        return Err(QuoteError::InvalidSubmission);
    };
    if pickup_postal_code.is_empty() {
        return Err(QuoteError::InvalidSubmission);
    }

    let pickup_display = resolve_display_address(
        &submission.pickup,
        submission.legacy_formatted_address.as_deref(),
        None,
    );
    let delivery_display =
        resolve_display_address(&submission.delivery, None, Some(&delivery_postal_code));
    let geo = resolve_geo(&submission).cloned();

    Ok(ValidatedQuote {
        submission,
        requester_name,
        requester_email,
        pickup_postal_code,
        delivery_postal_code,
        pickup_display,
        delivery_display,
        geo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::address::PLACEHOLDER;
    use crate::quote::domain::{Address, Coordinate};

    fn minimal() -> QuoteSubmission {
        QuoteSubmission {
            requester_name: Some("Ana".to_string()),
            requester_email: Some("ana@x.com".to_string()),
            legacy_postal_code: Some("01310100".to_string()),
            ..QuoteSubmission::default()
        }
    }

    fn geo(lat: f64, lng: f64) -> Geo {
        Geo {
            lat: Coordinate::from(lat),
            lng: Coordinate::from(lng),
            accuracy_meters: None,
        }
    }

    #[test]
    fn normalizes_postal_codes_to_digits() {
        assert_eq!(normalize_postal_code("01310-100"), "01310100");
        assert_eq!(normalize_postal_code(" 20.040-002 "), "20040002");
        assert_eq!(normalize_postal_code(""), "");
        assert_eq!(normalize_postal_code("abc"), "");
    }

    #[test]
    fn pickup_postal_code_prefers_structured_field() {
        let mut submission = minimal();
        submission.pickup.postal_code = Some("04538-132".to_string());
        assert_eq!(resolve_pickup_postal_code(&submission), "04538132");

        submission.pickup.postal_code = None;
        assert_eq!(resolve_pickup_postal_code(&submission), "01310100");
    }

    #[test]
    fn delivery_postal_code_ignores_legacy_field() {
        let submission = minimal();
        assert_eq!(resolve_delivery_postal_code(&submission), "");
    }

    #[test]
    fn geo_prefers_structured_reading() {
        let mut submission = minimal();
        assert!(resolve_geo(&submission).is_none());

        submission.legacy_geo = Some(geo(-22.9, -43.2));
        assert_eq!(resolve_geo(&submission), Some(&geo(-22.9, -43.2)));

        submission.pickup_geo = Some(geo(-23.5, -46.6));
        assert_eq!(resolve_geo(&submission), Some(&geo(-23.5, -46.6)));
    }

    #[test]
    fn rejects_missing_required_fields() {
        let mut no_name = minimal();
        no_name.requester_name = None;
        assert!(matches!(validate(no_name), Err(QuoteError::InvalidSubmission)));

        let mut no_email = minimal();
        no_email.requester_email = None;
        assert!(matches!(validate(no_email), Err(QuoteError::InvalidSubmission)));

        let mut punctuation_only = minimal();
        punctuation_only.legacy_postal_code = Some("--".to_string());
        assert!(matches!(
            validate(punctuation_only),
            Err(QuoteError::InvalidSubmission)
        ));
    }

    #[test]
    fn derives_display_fields() {
        let mut submission = minimal();
        submission.legacy_formatted_address = Some("Av. Paulista, 1000".to_string());
        submission.delivery = Address {
            postal_code: Some("20040-002".to_string()),
            ..Address::default()
        };

        let quote = validate(submission).expect("valid submission");
        assert_eq!(quote.pickup_postal_code, "01310100");
        assert_eq!(quote.pickup_display, "Av. Paulista, 1000");
        assert_eq!(quote.delivery_postal_code(), Some("20040002"));
        assert_eq!(quote.delivery_display, "CEP 20040002");
        assert!(quote.code().is_none());
    }

    #[test]
    fn pickup_without_address_or_fallback_is_placeholder() {
        let quote = validate(minimal()).expect("valid submission");
        assert_eq!(quote.pickup_display, PLACEHOLDER);
        assert_eq!(quote.delivery_display, PLACEHOLDER);
        assert!(quote.delivery_postal_code().is_none());
    }
}
