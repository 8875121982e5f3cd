//! Property edit form: formatting segment values for display and turning
//! typed text into engine writes. Out-of-range values are rejected here and
//! never reach the engine.

use crate::engine::SimulationEngine;
use crate::error::{Error, Result};
use crate::model::{Rgb, Segment};
use crate::selection::SelectionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyField {
    /// Degrees in the form, radians in the engine.
    Angle,
    /// Degrees per second in the form, radians per second in the engine.
    AngularVelocity,
    Mass,
    RodLength,
    Radius,
    Color,
}

impl PropertyField {
    pub const ALL: [PropertyField; 6] = [
        PropertyField::Angle,
        PropertyField::AngularVelocity,
        PropertyField::Mass,
        PropertyField::RodLength,
        PropertyField::Radius,
        PropertyField::Color,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PropertyField::Angle => "Angle",
            PropertyField::AngularVelocity => "Angular velocity",
            PropertyField::Mass => "Mass",
            PropertyField::RodLength => "Rod length",
            PropertyField::Radius => "Radius",
            PropertyField::Color => "Color",
        }
    }

    fn must_be_positive(self) -> bool {
        matches!(
            self,
            PropertyField::Mass | PropertyField::RodLength | PropertyField::Radius
        )
    }

    /// Text shown in the form for `segment`.
    pub fn format(self, segment: &Segment) -> String {
        match self {
            PropertyField::Angle => format!("{:.2}", segment.theta.to_degrees()),
            PropertyField::AngularVelocity => format!("{:.3}", segment.omega.to_degrees()),
            PropertyField::Mass => format!("{:.2}", segment.mass),
            PropertyField::RodLength => match segment.rod {
                Some(rod) => format!("{:.1}", rod.length),
                None => "0".to_string(),
            },
            PropertyField::Radius => format!("{:.1}", segment.radius),
            PropertyField::Color => segment.color.to_string(),
        }
    }
}

/// A validated form value in engine units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Color(Rgb),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// Input is still being typed (empty or a lone minus sign).
    Pending,
}

/// Validate `raw` for `field`. `Ok(None)` means the user is mid-entry.
pub fn parse_field(field: PropertyField, raw: &str) -> Result<Option<FieldValue>> {
    let text = raw.trim();
    if text.is_empty() || text == "-" {
        return Ok(None);
    }
    if field == PropertyField::Color {
        return Rgb::from_hex(text).map(|c| Some(FieldValue::Color(c)));
    }
    let value: f64 = text
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or(Error::InvalidNumber {
            field: field.label(),
        })?;
    if field.must_be_positive() && value <= 0.0 {
        return Err(Error::NonPositive {
            field: field.label(),
        });
    }
    let value = match field {
        PropertyField::Angle | PropertyField::AngularVelocity => value.to_radians(),
        _ => value,
    };
    Ok(Some(FieldValue::Number(value)))
}

/// Validate and write one field of the selected segment.
pub fn apply_edit<E: SimulationEngine + ?Sized>(
    engine: &mut E,
    selection: &mut SelectionState,
    field: PropertyField,
    raw: &str,
) -> Result<EditOutcome> {
    let index = selection
        .resolve(engine.segment_count())
        .ok_or(Error::NoSelection)?;
    let Some(value) = parse_field(field, raw)? else {
        return Ok(EditOutcome::Pending);
    };
    match (field, value) {
        (PropertyField::Angle, FieldValue::Number(v)) => engine.update_segment_angle(index, v),
        (PropertyField::AngularVelocity, FieldValue::Number(v)) => {
            engine.update_segment_angular_velocity(index, v)
        }
        (PropertyField::Mass, FieldValue::Number(v)) => engine.update_segment_mass(index, v),
        (PropertyField::RodLength, FieldValue::Number(v)) => {
            engine.update_segment_rod_length(index, v)
        }
        (PropertyField::Radius, FieldValue::Number(v)) => engine.update_segment_radius(index, v),
        (PropertyField::Color, FieldValue::Color(c)) => engine.update_segment_color(index, c),
        // parse_field only yields colors for the color field
        _ => return Err(Error::InvalidColor(raw.to_string())),
    }
    log::debug!("segment {index}: {} <- {raw}", field.label());
    selection.bump_render();
    Ok(EditOutcome::Applied)
}
