use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Postal address as posted by the quote form. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "cep", alias = "postalCode", default, deserialize_with = "lenient_string")]
    pub postal_code: Option<String>,
    #[serde(rename = "logradouro", alias = "street", default, deserialize_with = "lenient_string")]
    pub street: Option<String>,
    #[serde(rename = "numero", alias = "number", default, deserialize_with = "lenient_string")]
    pub number: Option<String>,
    #[serde(rename = "complemento", alias = "complement", default, deserialize_with = "lenient_string")]
    pub complement: Option<String>,
    #[serde(rename = "bairro", alias = "neighborhood", default, deserialize_with = "lenient_string")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cidade", alias = "city", default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(rename = "uf", alias = "stateCode", default, deserialize_with = "lenient_string")]
    pub state_code: Option<String>,
}

impl Address {
    /// True when any part that identifies a place (not just a postal code) is present.
    pub fn has_location_parts(&self) -> bool {
        self.street.is_some()
            || self.neighborhood.is_some()
            || self.city.is_some()
            || self.state_code.is_some()
    }
}

/// Browser geolocation reading. Coordinates are carried exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default)]
    pub lat: Coordinate,
    #[serde(default)]
    pub lng: Coordinate,
    #[serde(rename = "accuracy", alias = "accuracyMeters", default)]
    pub accuracy_meters: Option<Value>,
}

impl Geo {
    /// Accuracy rounded to whole meters with halves going up (`-2.5` gives `-2`);
    /// 0 when absent or unreadable. Out-of-range readings saturate.
    pub fn accuracy_whole_meters(&self) -> i64 {
        let meters = match &self.accuracy_meters {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
            _ => None,
        };

        match meters {
            Some(value) if value.is_finite() => {
                (value + 0.5).floor().clamp(i64::MIN as f64, i64::MAX as f64) as i64
            }
            _ => 0,
        }
    }
}

/// A latitude or longitude value, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate(pub Value);

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate(Value::from(value))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(raw) => f.write_str(raw),
            other => write!(f, "{other}"),
        }
    }
}

/// Quote request body. Field names on the wire follow the web form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSubmission {
    #[serde(rename = "codigo", alias = "code", default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(rename = "retirada", alias = "pickup", default, deserialize_with = "lenient_address")]
    pub pickup: Address,
    #[serde(rename = "entrega", alias = "delivery", default, deserialize_with = "lenient_address")]
    pub delivery: Address,
    #[serde(rename = "geoRetirada", alias = "pickupGeo", default, deserialize_with = "lenient_geo")]
    pub pickup_geo: Option<Geo>,

    #[serde(rename = "cep", default, deserialize_with = "lenient_string")]
    pub legacy_postal_code: Option<String>,
    #[serde(rename = "endereco", default, deserialize_with = "lenient_string")]
    pub legacy_formatted_address: Option<String>,
    #[serde(rename = "geo", default, deserialize_with = "lenient_geo")]
    pub legacy_geo: Option<Geo>,

    #[serde(rename = "nome", alias = "requesterName", default, deserialize_with = "lenient_string")]
    pub requester_name: Option<String>,
    #[serde(rename = "email", alias = "requesterEmail", default, deserialize_with = "lenient_string")]
    pub requester_email: Option<String>,
    #[serde(rename = "telefone", alias = "requesterPhone", default, deserialize_with = "lenient_string")]
    pub requester_phone: Option<String>,
    #[serde(rename = "detalhes", alias = "details", default, deserialize_with = "lenient_string")]
    pub details: Option<String>,
    #[serde(
        rename = "consentLocalizacao",
        alias = "locationConsentGiven",
        default,
        deserialize_with = "truthy_flag"
    )]
    pub location_consent_given: bool,
}

/// Strings, non-zero numbers and `true` become text; empty strings, `0`,
/// `false`, `null` and structured values are treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) if !raw.is_empty() => Some(raw),
        Some(Value::Number(number)) if !is_zero(&number) => Some(number.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

/// Only a JSON object carries address parts; anything else is an empty address.
fn lenient_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(Address::default()),
    }
}

/// Falsy values mean no reading. A truthy value that is not an object is a
/// reading without coordinates.
fn lenient_geo<'de, D>(deserializer: D) -> Result<Option<Geo>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(value) if is_truthy(&value) => Ok(Some(Geo::default())),
        _ => Ok(None),
    }
}

fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => !is_zero(number),
        Value::String(raw) => !raw.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_zero(number: &serde_json::Number) -> bool {
    number.as_f64().is_some_and(|n| n == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_form_payload_with_structured_addresses() {
        let submission: QuoteSubmission = serde_json::from_value(json!({
            "codigo": "SG-20250101-ABC123",
            "retirada": {
                "cep": "01310-100",
                "logradouro": "Av. Paulista",
                "numero": 1000,
                "cidade": "São Paulo",
                "uf": "SP"
            },
            "entrega": null,
            "geoRetirada": { "lat": -23.5, "lng": -46.6, "accuracy": 12.5 },
            "nome": "Ana",
            "email": "ana@x.com",
            "consentLocalizacao": true
        }))
        .expect("payload parses");

        assert_eq!(submission.code.as_deref(), Some("SG-20250101-ABC123"));
        assert_eq!(submission.pickup.number.as_deref(), Some("1000"));
        assert_eq!(submission.delivery, Address::default());
        assert!(submission.location_consent_given);
        let geo = submission.pickup_geo.expect("geo present");
        assert_eq!(geo.lat.to_string(), "-23.5");
        assert_eq!(geo.accuracy_whole_meters(), 13);
    }

    #[test]
    fn empty_strings_are_absent() {
        let submission: QuoteSubmission = serde_json::from_value(json!({
            "nome": "",
            "telefone": "",
            "retirada": { "cep": "", "bairro": "" }
        }))
        .expect("payload parses");

        assert!(submission.requester_name.is_none());
        assert!(submission.requester_phone.is_none());
        assert!(submission.pickup.postal_code.is_none());
        assert!(!submission.pickup.has_location_parts());
    }

    #[test]
    fn coordinates_render_verbatim() {
        let geo: Geo = serde_json::from_value(json!({ "lat": "abc", "lng": -46.63 }))
            .expect("geo parses");
        assert_eq!(geo.lat.to_string(), "abc");
        assert_eq!(geo.lng.to_string(), "-46.63");
        assert_eq!(geo.accuracy_whole_meters(), 0);
    }

    #[test]
    fn accuracy_rounds_half_up() {
        let geo = Geo {
            accuracy_meters: Some(json!("7.5")),
            ..Geo::default()
        };
        assert_eq!(geo.accuracy_whole_meters(), 8);

        let geo = Geo {
            accuracy_meters: Some(json!(7.49)),
            ..Geo::default()
        };
        assert_eq!(geo.accuracy_whole_meters(), 7);
    }

    #[test]
    fn accuracy_halves_round_up_and_extremes_saturate() {
        let geo = Geo {
            accuracy_meters: Some(json!(-2.5)),
            ..Geo::default()
        };
        assert_eq!(geo.accuracy_whole_meters(), -2);

        let geo = Geo {
            accuracy_meters: Some(json!(1e300)),
            ..Geo::default()
        };
        assert_eq!(geo.accuracy_whole_meters(), i64::MAX);
    }

    #[test]
    fn falsy_scalars_are_absent_text() {
        let submission: QuoteSubmission = serde_json::from_value(json!({
            "nome": false,
            "codigo": 0,
            "telefone": true,
            "retirada": { "numero": 0, "cep": 1310100 }
        }))
        .expect("payload parses");

        assert!(submission.requester_name.is_none());
        assert!(submission.code.is_none());
        assert_eq!(submission.requester_phone.as_deref(), Some("true"));
        assert!(submission.pickup.number.is_none());
        assert_eq!(submission.pickup.postal_code.as_deref(), Some("1310100"));
    }

    #[test]
    fn non_object_addresses_are_empty() {
        for raw in [json!(""), json!(false), json!(0), json!("Rua A"), json!([1, 2])] {
            let submission: QuoteSubmission =
                serde_json::from_value(json!({ "retirada": raw.clone(), "entrega": raw }))
                    .expect("payload parses");
            assert_eq!(submission.pickup, Address::default());
            assert_eq!(submission.delivery, Address::default());
        }
    }

    #[test]
    fn falsy_geo_is_absent_and_truthy_scalar_is_empty_reading() {
        let submission: QuoteSubmission = serde_json::from_value(json!({
            "geoRetirada": "",
            "geo": { "lat": -22.9, "lng": -43.2 }
        }))
        .expect("payload parses");
        assert!(submission.pickup_geo.is_none());
        assert_eq!(
            submission.legacy_geo.map(|geo| geo.lat.to_string()).as_deref(),
            Some("-22.9")
        );

        for raw in [json!(false), json!(0), Value::Null] {
            let submission: QuoteSubmission =
                serde_json::from_value(json!({ "geoRetirada": raw })).expect("payload parses");
            assert!(submission.pickup_geo.is_none());
        }

        let submission: QuoteSubmission =
            serde_json::from_value(json!({ "geo": 5 })).expect("payload parses");
        assert_eq!(submission.legacy_geo, Some(Geo::default()));
    }

    #[test]
    fn consent_accepts_truthy_values() {
        for (raw, expected) in [
            (json!(true), true),
            (json!("sim"), true),
            (json!(1), true),
            (json!(0), false),
            (json!(""), false),
            (Value::Null, false),
        ] {
            let submission: QuoteSubmission =
                serde_json::from_value(json!({ "consentLocalizacao": raw }))
                    .expect("payload parses");
            assert_eq!(submission.location_consent_given, expected);
        }
    }
}
