//! Flight search adapter.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::serpapi::SearchProvider;
use super::validation::{
    default_currency, iso_date, optional_date, require_non_empty, require_ordered,
};
use super::{field_text, ToolKind};
use crate::error::PlannerResult;

pub const NO_FLIGHTS: &str = "No flights found";

const ENGINE: &str = "google_flights";

/// Arguments of a `flight_search` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlightQuery {
    pub departure_id: String,
    pub arrival_id: String,
    #[serde(deserialize_with = "iso_date")]
    pub outbound_date: NaiveDate,
    #[serde(default, deserialize_with = "optional_date")]
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl FlightQuery {
    pub fn validate(&self) -> PlannerResult<()> {
        let tool = ToolKind::FlightSearch.name();
        require_non_empty(tool, "departure_id", &self.departure_id)?;
        require_non_empty(tool, "arrival_id", &self.arrival_id)?;
        if let Some(return_date) = self.return_date {
            require_ordered(tool, "outbound_date", self.outbound_date, "return_date", return_date)?;
        }
        Ok(())
    }

    /// Provider parameters; a round trip goes out as one request carrying both dates.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("engine", ENGINE.to_string()),
            ("departure_id", self.departure_id.trim().to_string()),
            ("arrival_id", self.arrival_id.trim().to_string()),
            ("outbound_date", self.outbound_date.to_string()),
            ("currency", self.currency.clone()),
            ("hl", "en".to_string()),
        ];
        if let Some(return_date) = self.return_date {
            params.push(("return_date", return_date.to_string()));
        }
        params
    }
}

pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "departure_id": {
                "type": "string",
                "description": "Departure airport code, e.g. BOS"
            },
            "arrival_id": {
                "type": "string",
                "description": "Arrival airport code, e.g. HND"
            },
            "outbound_date": {
                "type": "string",
                "description": "Outbound date in YYYY-MM-DD format"
            },
            "return_date": {
                "type": "string",
                "description": "Optional return date in YYYY-MM-DD format for round trips"
            },
            "currency": {
                "type": "string",
                "description": "Currency code for prices (default: USD)"
            }
        },
        "required": ["departure_id", "arrival_id", "outbound_date"]
    })
}

pub async fn search(provider: &dyn SearchProvider, query: &FlightQuery) -> PlannerResult<String> {
    let result = provider.search(&query.params()).await?;
    Ok(format_flights(&result))
}

/// Reduce a provider payload to one text block per "best" option.
pub fn format_flights(result: &Value) -> String {
    let options = match result.get("best_flights").and_then(Value::as_array) {
        Some(options) if !options.is_empty() => options,
        _ => return NO_FLIGHTS.to_string(),
    };

    let mut output = Vec::new();
    for option in options {
        output.push(format!(
            "Flight Option - Price: ${}",
            field_text(option.get("price"))
        ));

        let legs = option
            .get("flights")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for leg in legs {
            let dep = leg.get("departure_airport");
            let arr = leg.get("arrival_airport");
            let carrier = format!(
                "  {} {}",
                field_text(leg.get("airline")),
                match leg.get("flight_number") {
                    None | Some(Value::Null) => String::new(),
                    number => field_text(number),
                }
            );
            output.push(format!(
                "  {} → {}: {} - {}\n{}\n  Duration: {} minutes",
                field_text(dep.and_then(|a| a.get("id"))),
                field_text(arr.and_then(|a| a.get("id"))),
                field_text(dep.and_then(|a| a.get("time"))),
                field_text(arr.and_then(|a| a.get("time"))),
                carrier.trim_end(),
                field_text(leg.get("duration")),
            ));
        }
        output.push(String::new());
    }

    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leg(from: &str, to: &str, number: &str) -> Value {
        json!({
            "departure_airport": {"id": from, "time": "2025-06-01 08:00"},
            "arrival_airport": {"id": to, "time": "2025-06-01 11:30"},
            "airline": "Delta",
            "flight_number": number,
            "duration": 210
        })
    }

    #[test]
    fn missing_or_empty_best_flights_reports_none() {
        assert_eq!(format_flights(&json!({})), NO_FLIGHTS);
        assert_eq!(format_flights(&json!({"best_flights": []})), NO_FLIGHTS);
        assert_eq!(
            format_flights(&json!({"other_flights": [{"price": 10}]})),
            NO_FLIGHTS
        );
    }

    #[test]
    fn renders_every_leg_in_order() {
        let result = json!({
            "best_flights": [{
                "price": 1234,
                "flights": [leg("BOS", "DTW", "DL 100"), leg("DTW", "HND", "DL 275")]
            }]
        });

        let expected = "Flight Option - Price: $1234\n\
            \x20 BOS → DTW: 2025-06-01 08:00 - 2025-06-01 11:30\n\
            \x20 Delta DL 100\n\
            \x20 Duration: 210 minutes\n\
            \x20 DTW → HND: 2025-06-01 08:00 - 2025-06-01 11:30\n\
            \x20 Delta DL 275\n\
            \x20 Duration: 210 minutes\n";
        assert_eq!(format_flights(&result), expected);
    }

    #[test]
    fn preserves_provider_ordering_across_options() {
        let result = json!({
            "best_flights": [
                {"price": 900, "flights": [leg("BOS", "NRT", "JL 7")]},
                {"price": 700, "flights": [leg("BOS", "HND", "NH 9")]},
            ]
        });

        let text = format_flights(&result);
        let first = text.find("$900").unwrap();
        let second = text.find("$700").unwrap();
        assert!(first < second);
        assert!(text.contains("\n\nFlight Option - Price: $700"));
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let result = json!({"best_flights": [{"flights": [{}]}]});
        let text = format_flights(&result);
        assert!(text.starts_with("Flight Option - Price: $N/A"));
        assert!(text.contains("  N/A → N/A: N/A - N/A\n  N/A\n  Duration: N/A minutes"));
    }

    #[test]
    fn numeric_flight_number_is_rendered() {
        let result = json!({"best_flights": [{"price": 640, "flights": [
            {"airline": "ANA", "flight_number": 7}
        ]}]});
        let text = format_flights(&result);
        assert!(text.contains("\n  ANA 7\n"));
    }

    #[test]
    fn round_trip_adds_return_date() {
        let query: FlightQuery = serde_json::from_value(json!({
            "departure_id": "BOS",
            "arrival_id": "HND",
            "outbound_date": "2025-06-01",
            "return_date": "2025-06-06"
        }))
        .unwrap();

        let params = query.params();
        assert!(params.contains(&("engine", "google_flights".to_string())));
        assert!(params.contains(&("currency", "USD".to_string())));
        assert!(params.contains(&("return_date", "2025-06-06".to_string())));
    }

    #[test]
    fn one_way_omits_return_date() {
        let query: FlightQuery = serde_json::from_value(json!({
            "departure_id": "BOS",
            "arrival_id": "HND",
            "outbound_date": "2025-06-01"
        }))
        .unwrap();

        assert!(query.validate().is_ok());
        assert!(query.params().iter().all(|(k, _)| *k != "return_date"));
    }

    #[test]
    fn return_before_outbound_is_rejected() {
        let query: FlightQuery = serde_json::from_value(json!({
            "departure_id": "BOS",
            "arrival_id": "HND",
            "outbound_date": "2025-06-06",
            "return_date": "2025-06-01"
        }))
        .unwrap();

        assert!(query.validate().unwrap_err().is_recoverable());
    }
}
