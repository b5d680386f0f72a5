//! Hotel search adapter.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::serpapi::SearchProvider;
use super::validation::{default_currency, iso_date, require_non_empty, require_ordered};
use super::{field_text, ToolKind};
use crate::error::{PlannerError, PlannerResult};

pub const NO_HOTELS: &str = "No hotels found";

const ENGINE: &str = "google_hotels";
const MAX_AMENITIES: usize = 5;
const MAX_NEARBY_PLACES: usize = 3;

/// Arguments of a `hotel_search` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HotelQuery {
    pub location: String,
    #[serde(deserialize_with = "iso_date")]
    pub check_in_date: NaiveDate,
    #[serde(deserialize_with = "iso_date")]
    pub check_out_date: NaiveDate,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_adults() -> u32 {
    2
}

impl HotelQuery {
    pub fn validate(&self) -> PlannerResult<()> {
        let tool = ToolKind::HotelSearch.name();
        require_non_empty(tool, "location", &self.location)?;
        require_ordered(
            tool,
            "check_in_date",
            self.check_in_date,
            "check_out_date",
            self.check_out_date,
        )?;
        if self.adults == 0 {
            return Err(PlannerError::tool_argument(tool, "field 'adults' must be at least 1"));
        }
        Ok(())
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("engine", ENGINE.to_string()),
            ("q", self.location.trim().to_string()),
            ("check_in_date", self.check_in_date.to_string()),
            ("check_out_date", self.check_out_date.to_string()),
            ("adults", self.adults.to_string()),
            ("currency", self.currency.clone()),
            ("gl", "us".to_string()),
            ("hl", "en".to_string()),
        ]
    }
}

pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "location": {
                "type": "string",
                "description": "City, neighborhood or free-form place to search hotels in"
            },
            "check_in_date": {
                "type": "string",
                "description": "Check-in date in YYYY-MM-DD format"
            },
            "check_out_date": {
                "type": "string",
                "description": "Check-out date in YYYY-MM-DD format"
            },
            "adults": {
                "type": "integer",
                "description": "Number of adult guests (default: 2)"
            },
            "currency": {
                "type": "string",
                "description": "Currency code for prices (default: USD)"
            }
        },
        "required": ["location", "check_in_date", "check_out_date"]
    })
}

pub async fn search(provider: &dyn SearchProvider, query: &HotelQuery) -> PlannerResult<String> {
    let result = provider.search(&query.params()).await?;
    Ok(format_hotels(&result))
}

/// Reduce a provider payload to one text block per property.
pub fn format_hotels(result: &Value) -> String {
    let properties = match result.get("properties").and_then(Value::as_array) {
        Some(properties) if !properties.is_empty() => properties,
        _ => return NO_HOTELS.to_string(),
    };

    let mut output = Vec::new();
    for property in properties {
        output.push(format_property(property));
        output.push(String::new());
    }
    output.join("\n")
}

fn format_property(property: &Value) -> String {
    let mut lines = vec![format!("Hotel: {}", field_text(property.get("name")))];

    if let Some(rate) = property.get("rate_per_night") {
        lines.push(format!("Price per night: {}", field_text(rate.get("lowest"))));
    }
    if let Some(total) = property.get("total_rate") {
        lines.push(format!("Total price: {}", field_text(total.get("lowest"))));
    }

    lines.push(format!("Rating: {}/5.0", field_text(property.get("overall_rating"))));
    lines.push(format!("Reviews: {}", field_text(property.get("reviews"))));
    lines.push(format!("Hotel Class: {}", field_text(property.get("hotel_class"))));
    lines.push(format!("Check-in: {}", field_text(property.get("check_in_time"))));
    lines.push(format!("Check-out: {}", field_text(property.get("check_out_time"))));

    if property
        .get("eco_certified")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        lines.push("✓ Eco-certified".to_string());
    }

    if let Some(coords) = property.get("gps_coordinates") {
        lines.push(format!(
            "Location: {}, {}",
            field_text(coords.get("latitude")),
            field_text(coords.get("longitude"))
        ));
    }

    if let Some(amenities) = property
        .get("amenities")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
    {
        lines.push("\nAmenities:".to_string());
        lines.extend(
            amenities
                .iter()
                .take(MAX_AMENITIES)
                .map(|amenity| format!("- {}", field_text(Some(amenity)))),
        );
    }

    if let Some(places) = property.get("nearby_places").and_then(Value::as_array) {
        lines.push("\nNearby Places:".to_string());
        for place in places.iter().take(MAX_NEARBY_PLACES) {
            lines.push(format!("- {}", field_text(place.get("name"))));
            let transportations = place
                .get("transportations")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for transport in transportations {
                lines.push(format!(
                    "  • {}: {}",
                    field_text(transport.get("type")),
                    field_text(transport.get("duration"))
                ));
            }
        }
    }

    lines.join("\n")
}
