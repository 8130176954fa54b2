//! Parse-and-validate step for operator input.
//!
//! Operators type offsets and dimensions as free text. Everything is parsed
//! into typed [`Position`]/[`Size`] values here, before any command is planned,
//! so a malformed number never reaches the authority or the local set.

use marquee_proto::{OverlayPatch, Position, Size};

use crate::error::{Field, ValidationError};

/// Raw create-form input, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayForm {
    /// Label text.
    pub text: String,
    /// Top offset.
    pub top: String,
    /// Left offset.
    pub left: String,
    /// Rectangle width.
    pub width: String,
    /// Rectangle height.
    pub height: String,
}

impl Default for OverlayForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            top: "50".into(),
            left: "50".into(),
            width: "200".into(),
            height: "100".into(),
        }
    }
}

impl OverlayForm {
    /// Form prefilled with `text` and the default placement.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// Parse every field, failing on the first invalid one.
    pub fn parse(&self) -> Result<OverlayFields, ValidationError> {
        let text = validate_text(&self.text)?;
        let position =
            Position::new(parse_offset(Field::Top, &self.top)?, parse_offset(Field::Left, &self.left)?);
        let size = Size::new(
            parse_extent(Field::Width, &self.width)?,
            parse_extent(Field::Height, &self.height)?,
        );
        Ok(OverlayFields { text, position, size })
    }
}

/// Validated overlay content, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayFields {
    /// Non-empty label text.
    pub text: String,
    /// Top-left corner.
    pub position: Position,
    /// Positive dimensions.
    pub size: Size,
}

fn parse_integer(field: Field, input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber { field, input: input.to_string() })
}

/// Parse a non-negative pixel offset.
pub fn parse_offset(field: Field, input: &str) -> Result<u32, ValidationError> {
    let value = parse_integer(field, input)?;
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}

/// Parse a positive pixel extent.
pub fn parse_extent(field: Field, input: &str) -> Result<u32, ValidationError> {
    let value = parse_integer(field, input)?;
    if value <= 0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}

/// Reject blank text. The text itself is kept as typed.
pub fn validate_text(text: &str) -> Result<String, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text.to_string())
}

/// Reject zero-sized rectangles.
pub fn validate_size(size: Size) -> Result<Size, ValidationError> {
    if size.width == 0 {
        return Err(ValidationError::NotPositive { field: Field::Width, value: 0 });
    }
    if size.height == 0 {
        return Err(ValidationError::NotPositive { field: Field::Height, value: 0 });
    }
    Ok(size)
}

/// Validate the present fields of a partial update.
pub fn validate_patch(patch: &OverlayPatch) -> Result<(), ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }
    if let Some(text) = &patch.text {
        validate_text(text)?;
    }
    if let Some(size) = patch.size {
        validate_size(size)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn form(text: &str, top: &str, left: &str, width: &str, height: &str) -> OverlayForm {
        OverlayForm {
            text: text.into(),
            top: top.into(),
            left: left.into(),
            width: width.into(),
            height: height.into(),
        }
    }

    #[test]
    fn parses_valid_form() {
        let fields = form("ALERT", "10", " 10 ", "100", "50").parse().unwrap();
        assert_eq!(fields.text, "ALERT");
        assert_eq!(fields.position, Position::new(10, 10));
        assert_eq!(fields.size, Size::new(100, 50));
    }

    #[test]
    fn default_form_only_lacks_text() {
        assert_eq!(OverlayForm::default().parse(), Err(ValidationError::EmptyText));

        let fields = OverlayForm::with_text("hi").parse().unwrap();
        assert_eq!(fields.position, Position::new(50, 50));
        assert_eq!(fields.size, Size::new(200, 100));
    }

    #[test]
    fn rejects_blank_text_before_numbers() {
        let err = form("   ", "x", "0", "1", "1").parse().unwrap_err();
        assert_eq!(err, ValidationError::EmptyText);
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let err = form("a", "0", "ten", "1", "1").parse().unwrap_err();
        assert_eq!(err, ValidationError::NotANumber { field: Field::Left, input: "ten".into() });

        let err = form("a", "0", "0", "1.5", "1").parse().unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: Field::Width, .. }));

        let err = form("a", "", "0", "1", "1").parse().unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: Field::Top, .. }));
    }

    #[test]
    fn rejects_negative_offsets_and_empty_extents() {
        let err = form("a", "-1", "0", "1", "1").parse().unwrap_err();
        assert_eq!(err, ValidationError::Negative { field: Field::Top, value: -1 });

        let err = form("a", "0", "0", "1", "0").parse().unwrap_err();
        assert_eq!(err, ValidationError::NotPositive { field: Field::Height, value: 0 });
    }

    #[test]
    fn rejects_values_beyond_pixel_range() {
        let err = parse_offset(Field::Left, "99999999999").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: Field::Left, .. }));
    }

    #[test]
    fn patch_validation() {
        assert_eq!(validate_patch(&OverlayPatch::default()), Err(ValidationError::EmptyPatch));
        assert!(validate_patch(&OverlayPatch::visibility(false)).is_ok());

        let blank = OverlayPatch { text: Some(String::new()), ..OverlayPatch::default() };
        assert_eq!(validate_patch(&blank), Err(ValidationError::EmptyText));

        let flat = OverlayPatch { size: Some(Size::new(10, 0)), ..OverlayPatch::default() };
        assert!(matches!(validate_patch(&flat), Err(ValidationError::NotPositive { .. })));
    }

    proptest! {
        #[test]
        fn offsets_round_trip_through_text(value in 0u32..=u32::MAX) {
            prop_assert_eq!(parse_offset(Field::Top, &value.to_string()), Ok(value));
        }

        #[test]
        fn garbage_never_parses(input in "[a-zA-Z%#]{1,6}") {
            let is_not_a_number =
                matches!(parse_extent(Field::Width, &input), Err(ValidationError::NotANumber { .. }));
            prop_assert!(is_not_a_number);
        }
    }
}
