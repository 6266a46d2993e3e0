use super::address::PLACEHOLDER;
use super::domain::{Address, Geo};

pub fn maps_link_from_geo(geo: &Geo) -> String {
    format!("https://maps.google.com/?q={},{}", geo.lat, geo.lng)
}

/// Google Maps search for the address parts, comma-joined and percent-encoded.
pub fn maps_link_from_address(address: &Address, postal_code: Option<&str>) -> String {
    let postal_code = postal_code
        .filter(|code| !code.is_empty())
        .map(|code| format!("CEP {code}"));

    let query = [
        address.street.as_deref(),
        address.number.as_deref(),
        address.complement.as_deref(),
        address.neighborhood.as_deref(),
        address.city.as_deref(),
        address.state_code.as_deref(),
        postal_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        urlencoding::encode(&query)
    )
}

/// A reading from the browser always wins over the typed address.
pub fn pickup_map_link(address: &Address, postal_code: &str, geo: Option<&Geo>) -> String {
    match geo {
        Some(geo) => maps_link_from_geo(geo),
        None => maps_link_from_address(address, Some(postal_code)),
    }
}

/// `None` when there is nothing to locate the delivery by.
pub fn delivery_map_link(
    address: &Address,
    postal_code: &str,
    display_address: &str,
) -> Option<String> {
    if postal_code.is_empty() && display_address == PLACEHOLDER {
        return None;
    }
    Some(maps_link_from_address(address, Some(postal_code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::domain::Coordinate;

    fn paulista() -> Address {
        Address {
            street: Some("Av. Paulista".to_string()),
            number: Some("1000".to_string()),
            city: Some("São Paulo".to_string()),
            state_code: Some("SP".to_string()),
            ..Address::default()
        }
    }

    #[test]
    fn geo_link_uses_raw_values() {
        let geo = Geo {
            lat: Coordinate::from(-23.5),
            lng: Coordinate::from(-46.6),
            accuracy_meters: None,
        };
        assert_eq!(maps_link_from_geo(&geo), "https://maps.google.com/?q=-23.5,-46.6");
    }

    #[test]
    fn address_link_encodes_query() {
        assert_eq!(
            maps_link_from_address(&paulista(), Some("01310100")),
            "https://www.google.com/maps/search/?api=1&query=\
             Av.%20Paulista%2C%201000%2C%20S%C3%A3o%20Paulo%2C%20SP%2C%20CEP%2001310100"
        );
    }

    #[test]
    fn address_link_skips_missing_postal_code() {
        let link = maps_link_from_address(&paulista(), Some(""));
        assert!(!link.contains("CEP"));
    }

    #[test]
    fn pickup_link_prefers_geo_over_full_address() {
        let geo = Geo {
            lat: Coordinate::from(-23.5),
            lng: Coordinate::from(-46.6),
            accuracy_meters: None,
        };
        assert_eq!(
            pickup_map_link(&paulista(), "01310100", Some(&geo)),
            "https://maps.google.com/?q=-23.5,-46.6"
        );
        assert!(pickup_map_link(&paulista(), "01310100", None)
            .starts_with("https://www.google.com/maps/search/"));
    }

    #[test]
    fn delivery_link_requires_postal_code_or_address() {
        assert!(delivery_map_link(&Address::default(), "", PLACEHOLDER).is_none());
        assert_eq!(
            delivery_map_link(&Address::default(), "20040002", "CEP 20040002").as_deref(),
            Some("https://www.google.com/maps/search/?api=1&query=CEP%2020040002")
        );
    }
}
