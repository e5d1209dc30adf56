//! Classifications (one evaluation of one definition for one student) and
//! the students that own them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::definition::ValueType;
use crate::dto::{ClassificationDto, Normalize, StudentReport};
use crate::error::GradesError;

/// A classification value. Which variant is valid is decided by the
/// definition's [`ValueType`]; this layer does not cross-check it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationValue {
    Number(serde_json::Number),
    Text(String),
    Boolean(bool),
}

impl ClassificationValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ClassificationValue::Number(_) => ValueType::Number,
            ClassificationValue::Text(_) => ValueType::String,
            ClassificationValue::Boolean(_) => ValueType::Boolean,
        }
    }

    pub fn matches(&self, value_type: ValueType) -> bool {
        self.value_type() == value_type
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ClassificationValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClassificationValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClassificationValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<i64> for ClassificationValue {
    fn from(n: i64) -> Self {
        ClassificationValue::Number(n.into())
    }
}

impl From<i32> for ClassificationValue {
    fn from(n: i32) -> Self {
        ClassificationValue::Number(n.into())
    }
}

impl TryFrom<f64> for ClassificationValue {
    type Error = GradesError;

    /// Fails for NaN and infinities, which JSON cannot carry.
    fn try_from(n: f64) -> Result<Self, GradesError> {
        serde_json::Number::from_f64(n)
            .map(ClassificationValue::Number)
            .ok_or_else(|| GradesError::Serialization(format!("non-finite value {n}")))
    }
}

impl From<&str> for ClassificationValue {
    fn from(s: &str) -> Self {
        ClassificationValue::Text(s.to_string())
    }
}

impl From<String> for ClassificationValue {
    fn from(s: String) -> Self {
        ClassificationValue::Text(s)
    }
}

impl From<bool> for ClassificationValue {
    fn from(b: bool) -> Self {
        ClassificationValue::Boolean(b)
    }
}

/// One evaluation of a definition for a student.
///
/// `timestamp` is the last-update time in epoch milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub student_username: String,
    pub definition_identifier: String,
    pub value: ClassificationValue,
    pub note: Option<String>,
    pub timestamp: Option<i64>,
}

impl Classification {
    pub fn new(
        student_username: impl Into<String>,
        definition_identifier: impl Into<String>,
        value: impl Into<ClassificationValue>,
    ) -> Self {
        Self {
            student_username: student_username.into(),
            definition_identifier: definition_identifier.into(),
            value: value.into(),
            note: None,
            timestamp: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn serialize(&self) -> ClassificationDto {
        ClassificationDto::from(self)
    }
}

/// Classifications of one student keyed by definition identifier.
pub type ClassificationMap = HashMap<String, Classification>;

/// A student enrolled in a course, with their classifications.
///
/// Every entry of `classifications` belongs to `username` and is keyed by
/// its own definition identifier. The parsers and [`Student::classify`]
/// build entries that way; code mutating the public map directly has to
/// keep it so.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub username: String,
    pub personal_number: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub classifications: ClassificationMap,
}

impl Student {
    /// A student without classifications.
    pub fn new(
        username: impl Into<String>,
        personal_number: Option<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            personal_number,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            classifications: ClassificationMap::new(),
        }
    }

    /// Normalizes any of the student-shaped responses.
    pub fn parse(report: impl Into<StudentReport>) -> Self {
        report.into().normalize()
    }

    /// Records `value` for `definition_identifier`, replacing any previous
    /// entry, and returns the stored classification.
    pub fn classify(
        &mut self,
        definition_identifier: impl Into<String>,
        value: impl Into<ClassificationValue>,
        note: Option<String>,
    ) -> &Classification {
        let definition_identifier = definition_identifier.into();
        let classification = Classification {
            student_username: self.username.clone(),
            definition_identifier: definition_identifier.clone(),
            value: value.into(),
            note,
            timestamp: None,
        };
        self.classifications
            .insert(definition_identifier.clone(), classification);
        &self.classifications[&definition_identifier]
    }

    pub fn classification(&self, definition_identifier: &str) -> Option<&Classification> {
        self.classifications.get(definition_identifier)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
