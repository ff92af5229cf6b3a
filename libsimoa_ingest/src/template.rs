use std::fmt;
use std::path::Path;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::error::TemplateError;
use super::sample_row::DesignValue;
use super::well_location::{WellLocation, PLATE_COLUMNS, PLATE_ROWS};

/// Which plate coordinate a template keys its assignments by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "Row"),
            Axis::Column => write!(f, "Column"),
        }
    }
}

/// A single coordinate key in a template, typed by the axis it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Row(char),
    Column(u8),
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKey::Row(letter) => write!(f, "{letter}"),
            TemplateKey::Column(number) => write!(f, "{number}"),
        }
    }
}

/// An experiment-design layout: the axis the design runs along plus the
/// coordinate to label assignments.
///
/// Coordinates the design does not mention resolve to
/// [`DesignValue::Unassigned`]. Labels are arbitrary strings (a dilution
/// factor, a feeder name, a replicate index); interpreting them is the
/// analysis side's business.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    axis: Axis,
    assignments: FxHashMap<TemplateKey, String>,
}

/// On-disk template shape:
///
/// ```yml
/// axis: Row
/// assignments:
///   A: 0.5
///   B: 0.1
/// ```
///
/// Keys are YAML scalars (letters for row-keyed templates, numbers for
/// column-keyed ones) and are validated against the declared axis on
/// conversion to a [`Template`].
#[derive(Debug, Deserialize)]
struct TemplateFile {
    axis: Axis,
    #[serde(default)]
    assignments: serde_yaml::Mapping,
}

fn key_from_yaml(axis: Axis, key: &serde_yaml::Value) -> Result<TemplateKey, TemplateError> {
    let parsed = match axis {
        Axis::Row => key.as_str().and_then(|s| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => Some(TemplateKey::Row(letter)),
                _ => None,
            }
        }),
        Axis::Column => key
            .as_u64()
            .or_else(|| key.as_str().and_then(|s| s.parse().ok()))
            .and_then(|number| u8::try_from(number).ok())
            .map(TemplateKey::Column),
    };
    parsed.ok_or_else(|| TemplateError::BadKey(yaml_repr(key), axis))
}

fn label_from_yaml(key: &TemplateKey, value: &serde_yaml::Value) -> Result<String, TemplateError> {
    match value {
        serde_yaml::Value::String(label) => Ok(label.clone()),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        _ => Err(TemplateError::BadValue(key.to_string())),
    }
}

fn yaml_repr(value: &serde_yaml::Value) -> String {
    match serde_yaml::to_string(value) {
        Ok(text) => text.trim_end().to_string(),
        Err(_) => format!("{value:?}"),
    }
}

impl Template {
    /// Build a template from typed assignments, validating every key against
    /// the axis.
    pub fn new(
        axis: Axis,
        assignments: impl IntoIterator<Item = (TemplateKey, String)>,
    ) -> Result<Self, TemplateError> {
        let mut map = FxHashMap::default();
        for (key, label) in assignments {
            Self::check_key(axis, key)?;
            map.insert(key, label);
        }
        Ok(Template {
            axis,
            assignments: map,
        })
    }

    /// Load a template from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        if !path.exists() {
            return Err(TemplateError::BadFilePath(path.to_path_buf()));
        }
        let yaml_str = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml_str)
    }

    /// Parse a template from YAML text, validating keys against the declared
    /// axis and flattening scalar values to label strings.
    pub fn from_yaml_str(yaml_str: &str) -> Result<Self, TemplateError> {
        let raw: TemplateFile = serde_yaml::from_str(yaml_str)?;
        let mut assignments = Vec::with_capacity(raw.assignments.len());
        for (key, value) in &raw.assignments {
            let key = key_from_yaml(raw.axis, key)?;
            let label = label_from_yaml(&key, value)?;
            assignments.push((key, label));
        }
        Self::new(raw.axis, assignments)
    }

    fn check_key(axis: Axis, key: TemplateKey) -> Result<(), TemplateError> {
        let valid = match (axis, key) {
            (Axis::Row, TemplateKey::Row(letter)) => PLATE_ROWS.contains(&letter),
            (Axis::Column, TemplateKey::Column(number)) => {
                (1..=PLATE_COLUMNS).contains(&number)
            }
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(TemplateError::BadKey(key.to_string(), axis))
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Resolve the design value for a well.
    ///
    /// The coordinate to read is picked by a single branch on the declared
    /// axis; the assignment table holds nothing but assignments.
    pub fn value_for(&self, well: &WellLocation) -> DesignValue {
        let key = match self.axis {
            Axis::Row => TemplateKey::Row(well.row),
            Axis::Column => TemplateKey::Column(well.column),
        };
        match self.assignments.get(&key) {
            Some(label) => DesignValue::Assigned(label.clone()),
            None => DesignValue::Unassigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(row: char, column: u8) -> WellLocation {
        WellLocation {
            plate: 1,
            row,
            column,
        }
    }

    #[test]
    fn test_row_axis_from_yaml() {
        let template = Template::from_yaml_str(
            "axis: Row\nassignments:\n  A: 0.5\n  B: 0.1\n  C: FeederOne\n",
        )
        .unwrap();
        assert_eq!(template.axis(), Axis::Row);
        assert_eq!(template.len(), 3);
        assert_eq!(
            template.value_for(&well('A', 1)),
            DesignValue::Assigned("0.5".to_string())
        );
        assert_eq!(
            template.value_for(&well('C', 12)),
            DesignValue::Assigned("FeederOne".to_string())
        );
        assert_eq!(template.value_for(&well('D', 1)), DesignValue::Unassigned);
    }

    #[test]
    fn test_column_axis_from_yaml() {
        let template = Template::from_yaml_str(
            "axis: Column\nassignments:\n  1: FeederOne\n  7: FeederTwo\n  \"12\": FeederTwo\n",
        )
        .unwrap();
        assert_eq!(template.axis(), Axis::Column);
        assert_eq!(
            template.value_for(&well('A', 1)),
            DesignValue::Assigned("FeederOne".to_string())
        );
        assert_eq!(
            template.value_for(&well('H', 12)),
            DesignValue::Assigned("FeederTwo".to_string())
        );
        assert_eq!(template.value_for(&well('A', 2)), DesignValue::Unassigned);
    }

    #[test]
    fn test_axis_key_mismatch() {
        match Template::from_yaml_str("axis: Row\nassignments:\n  1: 0.5\n") {
            Err(TemplateError::BadKey(key, Axis::Row)) => assert_eq!(key, "1"),
            other => panic!("Expected bad key error, got {other:?}"),
        }
        match Template::from_yaml_str("axis: Column\nassignments:\n  A: FeederOne\n") {
            Err(TemplateError::BadKey(key, Axis::Column)) => assert_eq!(key, "A"),
            other => panic!("Expected bad key error, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_keys() {
        match Template::from_yaml_str("axis: Row\nassignments:\n  J: 0.5\n") {
            Err(TemplateError::BadKey(key, Axis::Row)) => assert_eq!(key, "J"),
            other => panic!("Expected bad key error, got {other:?}"),
        }
        match Template::from_yaml_str("axis: Column\nassignments:\n  13: FeederOne\n") {
            Err(TemplateError::BadKey(key, Axis::Column)) => assert_eq!(key, "13"),
            other => panic!("Expected bad key error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_scalar_value() {
        match Template::from_yaml_str("axis: Row\nassignments:\n  A: [1, 2]\n") {
            Err(TemplateError::BadValue(key)) => assert_eq!(key, "A"),
            other => panic!("Expected bad value error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_assignments() {
        let template = Template::from_yaml_str("axis: Row\n").unwrap();
        assert!(template.is_empty());
        assert_eq!(template.value_for(&well('A', 1)), DesignValue::Unassigned);
    }
}
