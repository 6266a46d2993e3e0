use super::domain::Address;

/// Shown wherever an optional value is absent.
pub const PLACEHOLDER: &str = "—";

/// Two-segment address line: `street nº number complement | neighborhood, city - UF`.
pub fn format_address_line(address: &Address) -> String {
    let number = address.number.as_ref().map(|number| format!("nº {number}"));
    let first = [
        address.street.as_deref(),
        number.as_deref(),
        address.complement.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    let mut second = [address.neighborhood.as_deref(), address.city.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    // The state only qualifies a neighborhood or city; on its own it is dropped.
    if !second.is_empty() {
        if let Some(state) = &address.state_code {
            second.push_str(" - ");
            second.push_str(state);
        }
    }

    [first, second]
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Picks the best human-readable description available for an address.
pub fn resolve_display_address(
    address: &Address,
    fallback: Option<&str>,
    fallback_postal_code: Option<&str>,
) -> String {
    if address.has_location_parts() {
        return format_address_line(address);
    }
    if let Some(formatted) = fallback.filter(|value| !value.is_empty()) {
        return formatted.to_string();
    }
    match fallback_postal_code.filter(|value| !value.is_empty()) {
        Some(postal_code) => format!("CEP {postal_code}"),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paulista() -> Address {
        Address {
            street: Some("Av. Paulista".to_string()),
            number: Some("1000".to_string()),
            neighborhood: Some("Bela Vista".to_string()),
            city: Some("São Paulo".to_string()),
            state_code: Some("SP".to_string()),
            ..Address::default()
        }
    }

    #[test]
    fn formats_both_segments() {
        assert_eq!(
            format_address_line(&paulista()),
            "Av. Paulista nº 1000 | Bela Vista, São Paulo - SP"
        );
    }

    #[test]
    fn omits_empty_segments() {
        let street_only = Address {
            street: Some("Rua Augusta".to_string()),
            complement: Some("apto 12".to_string()),
            ..Address::default()
        };
        assert_eq!(format_address_line(&street_only), "Rua Augusta apto 12");

        let city_only = Address {
            city: Some("Campinas".to_string()),
            state_code: Some("SP".to_string()),
            ..Address::default()
        };
        assert_eq!(format_address_line(&city_only), "Campinas - SP");
    }

    #[test]
    fn state_alone_yields_empty_line() {
        let state_only = Address {
            state_code: Some("RJ".to_string()),
            ..Address::default()
        };
        assert_eq!(format_address_line(&state_only), "");
    }

    #[test]
    fn display_address_prefers_structured_parts() {
        assert_eq!(
            resolve_display_address(&paulista(), Some("legacy line"), Some("01310100")),
            "Av. Paulista nº 1000 | Bela Vista, São Paulo - SP"
        );
    }

    #[test]
    fn display_address_falls_back_in_order() {
        let empty = Address::default();
        assert_eq!(
            resolve_display_address(&empty, Some("Rua X, 10"), Some("01310100")),
            "Rua X, 10"
        );
        assert_eq!(
            resolve_display_address(&empty, None, Some("01310100")),
            "CEP 01310100"
        );
        assert_eq!(resolve_display_address(&empty, None, Some("")), PLACEHOLDER);
        assert_eq!(resolve_display_address(&empty, None, None), PLACEHOLDER);
    }

    #[test]
    fn number_without_street_still_counts_as_placeholder() {
        let number_only = Address {
            number: Some("42".to_string()),
            ..Address::default()
        };
        assert_eq!(resolve_display_address(&number_only, None, None), PLACEHOLDER);
    }
}
