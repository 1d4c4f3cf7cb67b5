use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::core::error::AppError;
use crate::features::map::models::{MapMarker, NewMapMarker};
use crate::shared::constants::MISSING_FIELDS_MESSAGE;
use crate::shared::types::ActionResult;

/// A form value that may arrive as a JSON number or as a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Finite value, if the input parses as one
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(n) => *n,
            NumericInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

/// Request DTO for saving a new location from the save form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMapMarkerDto {
    /// Location name (required)
    #[validate(length(max = 255, message = "Name must not exceed 255 characters"))]
    pub name: Option<String>,

    /// Latitude, number or numeric string (required)
    #[schema(value_type = Option<String>)]
    pub lat: Option<NumericInput>,

    /// Longitude, number or numeric string (required)
    #[schema(value_type = Option<String>)]
    pub lng: Option<NumericInput>,

    /// Optional street address
    pub address: Option<String>,

    /// Optional notes
    pub description: Option<String>,
}

impl CreateMapMarkerDto {
    /// Check required fields, then field rules, and produce the insert payload.
    ///
    /// Nothing here touches the store, so a rejected form never writes.
    pub fn into_new_marker(self) -> Result<NewMapMarker, AppError> {
        let name = self.name.as_deref().filter(|n| !n.is_empty());
        let lat = self.lat.as_ref().and_then(NumericInput::as_f64);
        let lng = self.lng.as_ref().and_then(NumericInput::as_f64);

        let (Some(name), Some(lat), Some(lng)) = (name, lat, lng) else {
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };
        let name = name.to_string();

        self.validate()
            .map_err(|e| AppError::Validation(first_validation_message(&e)))?;

        Ok(NewMapMarker {
            name,
            lat,
            lng,
            address: self.address.filter(|s| !s.is_empty()),
            description: self.description.filter(|s| !s.is_empty()),
        })
    }
}

fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// Response DTO for a saved marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkerResponseDto {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub description: Option<String>,
    pub event_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<MapMarker> for MapMarkerResponseDto {
    fn from(m: MapMarker) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            lat: m.lat,
            lng: m.lng,
            description: m.description,
            event_date: m.event_date,
            created_at: m.created_at,
        }
    }
}

/// Outcome of the save-location action
pub type CreateMarkerResult = ActionResult<MapMarkerResponseDto>;

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: Option<&str>, lat: Option<NumericInput>, lng: Option<NumericInput>) -> CreateMapMarkerDto {
        CreateMapMarkerDto {
            name: name.map(str::to_string),
            lat,
            lng,
            ..Default::default()
        }
    }

    #[test]
    fn test_numeric_input_accepts_numbers_and_strings() {
        assert_eq!(NumericInput::Number(39.1).as_f64(), Some(39.1));
        assert_eq!(NumericInput::Text(" 117.2 ".to_string()).as_f64(), Some(117.2));
        assert_eq!(NumericInput::Text("abc".to_string()).as_f64(), None);
        assert_eq!(NumericInput::Text("NaN".to_string()).as_f64(), None);
    }

    #[test]
    fn test_numeric_input_deserializes_untagged() {
        let n: NumericInput = serde_json::from_str("39.1").unwrap();
        let s: NumericInput = serde_json::from_str("\"39.1\"").unwrap();
        assert_eq!(n.as_f64(), s.as_f64());
    }

    #[test]
    fn test_missing_name_is_rejected_with_fixed_message() {
        let err = dto(None, Some(39.1.into()), Some(117.2.into()))
            .into_new_marker()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == MISSING_FIELDS_MESSAGE));
    }

    #[test]
    fn test_empty_name_and_bad_coordinates_count_as_missing() {
        let cases = vec![
            dto(Some(""), Some(39.1.into()), Some(117.2.into())),
            dto(Some("Cafe"), None, Some(117.2.into())),
            dto(Some("Cafe"), Some(NumericInput::Text("north".into())), Some(117.2.into())),
            dto(Some("Cafe"), Some(39.1.into()), Some(NumericInput::Text(String::new()))),
        ];

        for case in cases {
            let err = case.into_new_marker().unwrap_err();
            assert_eq!(err.user_message(), MISSING_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn test_overlong_name_is_rejected() {
        let long = "x".repeat(256);
        let err = dto(Some(&long), Some(39.1.into()), Some(117.2.into()))
            .into_new_marker()
            .unwrap_err();
        assert_eq!(err.user_message(), "Name must not exceed 255 characters");
    }

    #[test]
    fn test_valid_form_normalizes_empty_optionals() {
        let mut form = dto(
            Some("Cafe"),
            Some(NumericInput::Text("39.1".into())),
            Some(117.2.into()),
        );
        form.address = Some(String::new());
        form.description = Some("Team lunch".to_string());

        let marker = form.into_new_marker().unwrap();
        assert_eq!(marker.name, "Cafe");
        assert_eq!(marker.lat, 39.1);
        assert_eq!(marker.lng, 117.2);
        assert_eq!(marker.address, None);
        assert_eq!(marker.description.as_deref(), Some("Team lunch"));
    }
}
