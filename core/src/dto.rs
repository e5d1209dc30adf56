//! Wire shapes of the grading service and their normalization into domain
//! types.
//!
//! # Design
//! Each response shape is its own `Deserialize` type and implements
//! [`Normalize`], so supporting another shape means adding one type and one
//! impl. The three student-shaped reports are also gathered in
//! [`StudentReport`] for code that handles them uniformly.
//!
//! Normalization assumes well-formed input: a missing required field fails
//! at deserialization, not here. Unknown fields are ignored.
//!
//! The write direction (`From<&Definition>`, `From<&Classification>` and
//! the `*_payload` functions) produces exactly what the service expects for
//! create, update and save calls.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize, Serializer};

use crate::classification::{Classification, ClassificationMap, ClassificationValue, Student};
use crate::definition::{
    ClassificationType, Definition, DefinitionWithChildren, EvaluationType, LocalizedNames,
    ValueType,
};

const LOCALE_CS: &str = "cs";
const LOCALE_EN: &str = "en";

/// Conversion of a wire shape into its domain representation.
pub trait Normalize {
    type Output;

    fn normalize(self) -> Self::Output;
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A name of a definition in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTextDto {
    pub identifier: String,
    pub name: String,
}

/// Definition record, as returned by the service and as sent on writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionDto {
    pub classification_text_dtos: Vec<ClassificationTextDto>,
    pub classification_type: ClassificationType,
    pub course_code: String,
    pub evaluation_type: EvaluationType,
    pub expression: Option<String>,
    pub hidden: bool,
    pub identifier: String,
    pub parent_identifier: Option<String>,
    pub maximum_value: Option<f64>,
    pub minimum_required_value: Option<f64>,
    pub minimum_value: Option<f64>,
    pub semester_code: String,
    pub value_type: ValueType,
}

/// Top-level node of the definition hierarchy. Grandchildren, if the
/// service sends any, are dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HierarchyNodeDto {
    #[serde(flatten)]
    pub definition: DefinitionDto,
    #[serde(default)]
    pub children: Vec<DefinitionDto>,
}

impl Normalize for DefinitionDto {
    type Output = Definition;

    fn normalize(self) -> Definition {
        let mut names = LocalizedNames::default();
        for text in self.classification_text_dtos {
            match text.identifier.as_str() {
                LOCALE_CS => names.cs = text.name,
                LOCALE_EN => names.en = text.name,
                _ => {}
            }
        }

        Definition {
            identifier: self.identifier,
            parent_identifier: self.parent_identifier.unwrap_or_default(),
            names,
            course_code: self.course_code,
            semester_code: self.semester_code,
            classification_type: self.classification_type,
            evaluation_type: self.evaluation_type,
            minimum_value: self.minimum_value,
            maximum_value: self.maximum_value,
            minimum_required_value: self.minimum_required_value,
            expression: self.expression,
            value_type: self.value_type,
            hidden: self.hidden,
        }
    }
}

impl Normalize for HierarchyNodeDto {
    type Output = DefinitionWithChildren;

    fn normalize(self) -> DefinitionWithChildren {
        DefinitionWithChildren {
            definition: self.definition.normalize(),
            children: self
                .children
                .into_iter()
                .map(Normalize::normalize)
                .collect(),
        }
    }
}

impl From<&Definition> for DefinitionDto {
    /// Both locales are always emitted, `cs` first.
    fn from(definition: &Definition) -> Self {
        DefinitionDto {
            classification_text_dtos: vec![
                ClassificationTextDto {
                    identifier: LOCALE_CS.to_string(),
                    name: definition.names.cs.clone(),
                },
                ClassificationTextDto {
                    identifier: LOCALE_EN.to_string(),
                    name: definition.names.en.clone(),
                },
            ],
            classification_type: definition.classification_type,
            course_code: definition.course_code.clone(),
            evaluation_type: definition.evaluation_type,
            expression: definition.expression.clone(),
            hidden: definition.hidden,
            identifier: definition.identifier.clone(),
            parent_identifier: Some(definition.parent_identifier.clone()),
            maximum_value: definition.maximum_value,
            minimum_required_value: definition.minimum_required_value,
            minimum_value: definition.minimum_value,
            semester_code: definition.semester_code.clone(),
            value_type: definition.value_type,
        }
    }
}

/// Body of the create call: definitions grouped by parent identifier.
/// Parents keep the order in which they first appear and each group keeps
/// the order its definitions were given in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionsByParent(Vec<(String, Vec<DefinitionDto>)>);

impl DefinitionsByParent {
    pub fn get(&self, parent_identifier: &str) -> Option<&[DefinitionDto]> {
        self.0
            .iter()
            .find(|(parent, _)| parent == parent_identifier)
            .map(|(_, group)| group.as_slice())
    }

    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(parent, _)| parent.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, parent_identifier: &str, dto: DefinitionDto) {
        match self.0.iter_mut().find(|(parent, _)| parent == parent_identifier) {
            Some((_, group)) => group.push(dto),
            None => self.0.push((parent_identifier.to_string(), vec![dto])),
        }
    }
}

impl Serialize for DefinitionsByParent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(parent, group)| (parent, group)))
    }
}

pub fn create_definitions_payload<'a>(
    definitions: impl IntoIterator<Item = &'a Definition>,
) -> DefinitionsByParent {
    let mut payload = DefinitionsByParent::default();
    for definition in definitions {
        payload.push(&definition.parent_identifier, definition.serialize());
    }
    payload
}

/// Body of the update call: one entry per definition identifier.
pub fn update_definitions_payload<'a>(
    definitions: impl IntoIterator<Item = &'a Definition>,
) -> BTreeMap<String, DefinitionDto> {
    definitions
        .into_iter()
        .map(|definition| (definition.identifier.clone(), definition.serialize()))
        .collect()
}

// ---------------------------------------------------------------------------
// Classifications
// ---------------------------------------------------------------------------

/// Classification as sent on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDto {
    pub classification_identifier: String,
    pub student_username: String,
    pub value: ClassificationValue,
    pub note: Option<String>,
    pub timestamp: Option<i64>,
}

impl From<&Classification> for ClassificationDto {
    fn from(classification: &Classification) -> Self {
        ClassificationDto {
            classification_identifier: classification.definition_identifier.clone(),
            student_username: classification.student_username.clone(),
            value: classification.value.clone(),
            note: classification.note.clone(),
            timestamp: classification.timestamp,
        }
    }
}

impl Normalize for ClassificationDto {
    type Output = Classification;

    fn normalize(self) -> Classification {
        Classification {
            student_username: self.student_username,
            definition_identifier: self.classification_identifier,
            value: self.value,
            note: self.note,
            timestamp: self.timestamp,
        }
    }
}

/// Body of the save call: a JSON array, one element per classification.
pub fn save_classifications_payload<'a>(
    classifications: impl IntoIterator<Item = &'a Classification>,
) -> Vec<ClassificationDto> {
    classifications
        .into_iter()
        .map(Classification::serialize)
        .collect()
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

/// Definition record combined with one student's value, as found in the
/// single-student report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentClassificationFullDto {
    pub identifier: String,
    pub value: ClassificationValue,
    pub note: Option<String>,
    pub last_updated: Option<i64>,
}

/// Full classification report of one student.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleStudentReport {
    pub username: String,
    pub personal_number: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub student_classification_full_dtos: Vec<StudentClassificationFullDto>,
}

/// Value of one `classificationMap` entry in the group report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassificationEntryDto {
    pub value: ClassificationValue,
    pub note: Option<String>,
    pub timestamp: Option<i64>,
}

/// One student of the group report, classifications keyed by definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStudentReport {
    pub username: String,
    pub personal_number: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub classification_map: HashMap<String, ClassificationEntryDto>,
}

/// One student of the group report restricted to a single definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDefinitionReport {
    pub student_username: String,
    pub classification_identifier: String,
    pub personal_number: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub value: ClassificationValue,
    pub note: Option<String>,
    pub timestamp: Option<i64>,
}

/// Any of the student-shaped responses.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentReport {
    SingleStudent(SingleStudentReport),
    Group(GroupStudentReport),
    GroupForDefinition(GroupDefinitionReport),
}

impl From<SingleStudentReport> for StudentReport {
    fn from(report: SingleStudentReport) -> Self {
        StudentReport::SingleStudent(report)
    }
}

impl From<GroupStudentReport> for StudentReport {
    fn from(report: GroupStudentReport) -> Self {
        StudentReport::Group(report)
    }
}

impl From<GroupDefinitionReport> for StudentReport {
    fn from(report: GroupDefinitionReport) -> Self {
        StudentReport::GroupForDefinition(report)
    }
}

/// Builds a student whose map entries all take the student's username and
/// are keyed by their own definition identifier.
fn build_student<I>(
    username: String,
    personal_number: Option<String>,
    email: String,
    first_name: String,
    last_name: String,
    entries: I,
) -> Student
where
    I: IntoIterator<Item = (String, ClassificationValue, Option<String>, Option<i64>)>,
{
    let classifications: ClassificationMap = entries
        .into_iter()
        .map(|(definition_identifier, value, note, timestamp)| {
            let classification = Classification {
                student_username: username.clone(),
                definition_identifier: definition_identifier.clone(),
                value,
                note,
                timestamp,
            };
            (definition_identifier, classification)
        })
        .collect();

    Student {
        username,
        personal_number,
        email,
        first_name,
        last_name,
        classifications,
    }
}

impl Normalize for SingleStudentReport {
    type Output = Student;

    fn normalize(self) -> Student {
        let entries = self
            .student_classification_full_dtos
            .into_iter()
            .map(|full| (full.identifier, full.value, full.note, full.last_updated));
        build_student(
            self.username,
            self.personal_number,
            self.email,
            self.first_name,
            self.last_name,
            entries,
        )
    }
}

impl Normalize for GroupStudentReport {
    type Output = Student;

    fn normalize(self) -> Student {
        let entries = self
            .classification_map
            .into_iter()
            .map(|(identifier, entry)| (identifier, entry.value, entry.note, entry.timestamp));
        build_student(
            self.username,
            self.personal_number,
            self.email,
            self.first_name,
            self.last_name,
            entries,
        )
    }
}

impl Normalize for GroupDefinitionReport {
    type Output = Student;

    fn normalize(self) -> Student {
        let entry = (
            self.classification_identifier,
            self.value,
            self.note,
            self.timestamp,
        );
        build_student(
            self.student_username,
            self.personal_number,
            self.email,
            self.first_name,
            self.last_name,
            [entry],
        )
    }
}

impl Normalize for StudentReport {
    type Output = Student;

    fn normalize(self) -> Student {
        match self {
            StudentReport::SingleStudent(report) => report.normalize(),
            StudentReport::Group(report) => report.normalize(),
            StudentReport::GroupForDefinition(report) => report.normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition_json(identifier: &str, parent: Option<&str>) -> serde_json::Value {
        json!({
            "id": 10295,
            "identifier": identifier,
            "parentId": null,
            "parentIdentifier": parent,
            "courseCode": "PI-ARB",
            "semesterCode": "B202",
            "evaluationType": "MANUAL",
            "classificationType": "HOMEWORK",
            "valueType": "NUMBER",
            "classificationTextDtos": [
                {"identifier": "cs", "name": "Domácí úkol"},
                {"identifier": "en", "name": "Homework"}
            ],
            "skillDtos": [],
            "hidden": false,
            "index": 0,
            "minimumValue": 0,
            "minimumRequiredValue": 0,
            "maximumValue": 10,
            "expression": null
        })
    }

    fn parse_definition(value: serde_json::Value) -> Definition {
        let dto: DefinitionDto = serde_json::from_value(value).unwrap();
        dto.normalize()
    }

    #[test]
    fn definition_flattens_locales_and_passes_fields_through() {
        let def = parse_definition(definition_json("homework1", Some("homework_total")));
        assert_eq!(def.identifier, "homework1");
        assert_eq!(def.parent_identifier, "homework_total");
        assert_eq!(def.names, LocalizedNames::new("Domácí úkol", "Homework"));
        assert_eq!(def.course_code, "PI-ARB");
        assert_eq!(def.semester_code, "B202");
        assert_eq!(def.classification_type, ClassificationType::Homework);
        assert_eq!(def.evaluation_type, EvaluationType::Manual);
        assert_eq!(def.value_type, ValueType::Number);
        assert_eq!(def.minimum_value, Some(0.0));
        assert_eq!(def.maximum_value, Some(10.0));
        assert_eq!(def.expression, None);
        assert!(!def.hidden);
    }

    #[test]
    fn missing_locale_defaults_to_empty() {
        let mut raw = definition_json("homework1", None);
        raw["classificationTextDtos"] = json!([{"identifier": "en", "name": "HW1"}]);
        let def = parse_definition(raw);
        assert_eq!(def.names.cs, "");
        assert_eq!(def.names.en, "HW1");
    }

    #[test]
    fn unknown_locale_is_ignored() {
        let mut raw = definition_json("homework1", None);
        raw["classificationTextDtos"] = json!([
            {"identifier": "de", "name": "Hausaufgabe"},
            {"identifier": "cs", "name": "DU1"}
        ]);
        let def = parse_definition(raw);
        assert_eq!(def.names, LocalizedNames::new("DU1", ""));
    }

    #[test]
    fn null_parent_becomes_root() {
        let def = parse_definition(definition_json("homework_total", None));
        assert_eq!(def.parent_identifier, "");
        assert!(def.is_root());
    }

    #[test]
    fn null_bounds_become_none() {
        let mut raw = definition_json("mark", None);
        raw["evaluationType"] = json!("EXPRESSION");
        raw["valueType"] = json!("STRING");
        raw["minimumValue"] = json!(null);
        raw["maximumValue"] = json!(null);
        raw["minimumRequiredValue"] = json!(null);
        raw["expression"] = json!("MARK(points)");
        let def = parse_definition(raw);
        assert_eq!(def.minimum_value, None);
        assert_eq!(def.maximum_value, None);
        assert_eq!(def.minimum_required_value, None);
        assert!(def.expression_is_consistent());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let mut raw = definition_json("homework1", None);
        raw.as_object_mut().unwrap().remove("courseCode");
        assert!(serde_json::from_value::<DefinitionDto>(raw).is_err());
    }

    #[test]
    fn serialize_emits_both_locales_in_fixed_order() {
        let mut def = parse_definition(definition_json("homework1", None));
        def.names = LocalizedNames::new("", "Only English");

        let json = serde_json::to_value(def.serialize()).unwrap();
        assert_eq!(
            json["classificationTextDtos"],
            json!([
                {"identifier": "cs", "name": ""},
                {"identifier": "en", "name": "Only English"}
            ])
        );
        assert_eq!(json["parentIdentifier"], "");
        assert_eq!(json["expression"], json!(null));
        assert_eq!(json["classificationType"], "HOMEWORK");
    }

    #[test]
    fn parse_of_serialize_reproduces_definition() {
        let mut def = parse_definition(definition_json("homework1", Some("homework_total")));
        def.hidden = true;
        def.minimum_required_value = None;

        let wire = serde_json::to_value(def.serialize()).unwrap();
        let back = parse_definition(wire);
        assert_eq!(back, def);
    }

    #[test]
    fn hierarchy_keeps_one_level_and_order() {
        let mut total = definition_json("homework_total", None);
        let mut hw1 = definition_json("homework1", Some("homework_total"));
        hw1["children"] = json!([definition_json("deep", Some("homework1"))]);
        let hw2 = definition_json("homework2", Some("homework_total"));
        total["children"] = json!([hw1, hw2]);
        let mut mark = definition_json("mark", None);
        mark["children"] = json!([]);

        let nodes: Vec<HierarchyNodeDto> = serde_json::from_value(json!([total, mark])).unwrap();
        let hierarchy: Vec<DefinitionWithChildren> =
            nodes.into_iter().map(Normalize::normalize).collect();

        assert_eq!(hierarchy.len(), 2);
        assert_eq!(hierarchy[0].identifier(), "homework_total");
        assert_eq!(hierarchy[0].parent_identifier, "");
        let children: Vec<&str> = hierarchy[0]
            .children
            .iter()
            .map(|c| c.identifier.as_str())
            .collect();
        assert_eq!(children, ["homework1", "homework2"]);
        assert!(hierarchy[0]
            .children
            .iter()
            .all(|c| c.parent_identifier == "homework_total"));
        assert_eq!(hierarchy[1].identifier(), "mark");
        assert!(hierarchy[1].children.is_empty());
    }

    #[test]
    fn child_with_null_parent_is_normalized() {
        let mut node = definition_json("points_total", None);
        node["children"] = json!([definition_json("orphan", None)]);
        let dto: HierarchyNodeDto = serde_json::from_value(node).unwrap();
        let parsed = dto.normalize();
        assert_eq!(parsed.children[0].parent_identifier, "");
    }

    #[test]
    fn create_payload_groups_by_parent_in_order() {
        let base = parse_definition(definition_json("d", None));
        let with = |id: &str, parent: &str| Definition {
            identifier: id.to_string(),
            parent_identifier: parent.to_string(),
            ..base.clone()
        };
        let defs = [with("d1", "root"), with("d3", "other"), with("d2", "root")];

        let payload = create_definitions_payload(&defs);

        assert_eq!(payload.len(), 2);
        assert_eq!(payload.parents().collect::<Vec<_>>(), ["root", "other"]);
        let ids = |key: &str| -> Vec<String> {
            payload
                .get(key)
                .unwrap()
                .iter()
                .map(|d| d.identifier.clone())
                .collect()
        };
        assert_eq!(ids("root"), ["d1", "d2"]);
        assert_eq!(ids("other"), ["d3"]);
        assert!(payload.get("missing").is_none());
    }

    #[test]
    fn create_payload_serializes_parents_in_first_seen_order() {
        let base = parse_definition(definition_json("d", None));
        let with = |id: &str, parent: &str| Definition {
            identifier: id.to_string(),
            parent_identifier: parent.to_string(),
            ..base.clone()
        };
        let defs = [with("z1", "zeta"), with("a1", "alpha"), with("z2", "zeta")];

        let json = serde_json::to_string(&create_definitions_payload(&defs)).unwrap();

        let zeta = json.find("\"zeta\":").unwrap();
        let alpha = json.find("\"alpha\":").unwrap();
        assert!(zeta < alpha);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["zeta"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn update_payload_keys_by_identifier() {
        let base = parse_definition(definition_json("d", None));
        let a = Definition {
            identifier: "a".to_string(),
            parent_identifier: "p".to_string(),
            ..base.clone()
        };
        let b = Definition {
            identifier: "b".to_string(),
            parent_identifier: "p".to_string(),
            ..base
        };

        let payload = update_definitions_payload([&a, &b]);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json.as_object().unwrap().len(), 2);
        assert_eq!(json["a"]["identifier"], "a");
        assert_eq!(json["b"]["parentIdentifier"], "p");
    }

    #[test]
    fn classification_serialize_renames_identifier() {
        let classification = Classification {
            student_username: "teststudent1".to_string(),
            definition_identifier: "homework1".to_string(),
            value: ClassificationValue::from(7),
            note: None,
            timestamp: Some(1619215245779),
        };

        let json = serde_json::to_value(classification.serialize()).unwrap();

        assert_eq!(
            json,
            json!({
                "classificationIdentifier": "homework1",
                "studentUsername": "teststudent1",
                "value": 7,
                "note": null,
                "timestamp": 1619215245779_i64
            })
        );
        let back: ClassificationDto = serde_json::from_value(json).unwrap();
        assert_eq!(back.normalize(), classification);
    }

    #[test]
    fn save_payload_is_an_indexed_array() {
        let first = Classification::new("s1", "homework1", 7);
        let second = Classification::new("s2", "mark", "C").with_note("ok");
        let payload = save_classifications_payload([&first, &second]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json[0]["studentUsername"], "s1");
        assert_eq!(json[1]["classificationIdentifier"], "mark");
        assert_eq!(json[1]["value"], "C");
        assert_eq!(json[1]["note"], "ok");
    }

    #[test]
    fn single_student_report_keys_by_identifier() {
        let raw = json!({
            "userId": null,
            "username": "teststudent1",
            "firstName": "Joe",
            "lastName": "Reacher",
            "fullName": "Joe Reacher",
            "email": "teststudent@fit.cvut.cz",
            "personalNumber": null,
            "grade": 5,
            "studentClassificationFullDtos": [
                {
                    "identifier": "homework1",
                    "classificationType": "HOMEWORK",
                    "value": 10,
                    "note": "",
                    "lastUpdated": 1619215327215_i64
                },
                {
                    "identifier": "mark",
                    "classificationType": "FINAL_SCORE",
                    "value": "B",
                    "note": null,
                    "lastUpdated": null
                }
            ]
        });
        let report: SingleStudentReport = serde_json::from_value(raw).unwrap();
        let student = Student::parse(report);

        assert_eq!(student.username, "teststudent1");
        assert_eq!(student.personal_number, None);
        assert_eq!(student.classifications.len(), 2);
        let hw = &student.classifications["homework1"];
        assert_eq!(hw.student_username, "teststudent1");
        assert_eq!(hw.definition_identifier, "homework1");
        assert_eq!(hw.value, ClassificationValue::from(10));
        assert_eq!(hw.note.as_deref(), Some(""));
        assert_eq!(hw.timestamp, Some(1619215327215));
        assert_eq!(
            student.classifications["mark"].value,
            ClassificationValue::from("B")
        );
    }

    #[test]
    fn group_report_uses_group_username() {
        let raw = json!({
            "userId": null,
            "username": "teststudent4",
            "firstName": "Tom",
            "lastName": "Riddle",
            "email": "teststudent@fit.cvut.cz",
            "personalNumber": "12345",
            "classificationMap": {
                "homework1": {"id": null, "timestamp": 1619215245779_i64, "value": 7, "note": ""},
                "mark": {"id": null, "timestamp": 1619215327287_i64, "value": "C", "note": null}
            }
        });
        let report: GroupStudentReport = serde_json::from_value(raw).unwrap();
        let student = Student::parse(report);

        let mut keys: Vec<&str> = student.classifications.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["homework1", "mark"]);
        for (key, classification) in &student.classifications {
            assert_eq!(classification.student_username, "teststudent4");
            assert_eq!(&classification.definition_identifier, key);
        }
        assert_eq!(
            student.classifications["homework1"].value,
            ClassificationValue::from(7)
        );
        assert_eq!(student.personal_number.as_deref(), Some("12345"));
    }

    #[test]
    fn group_for_definition_report_is_a_singleton() {
        let raw = json!({
            "id": 566256,
            "timestamp": null,
            "value": 28,
            "note": null,
            "authorUsername": null,
            "studentUsername": "teststudent4",
            "classificationIdentifier": "homework_total",
            "firstName": "Tom",
            "lastName": "Riddle",
            "email": "teststudent@fit.cvut.cz",
            "personalNumber": null,
            "parallelCodes": {}
        });
        let report: GroupDefinitionReport = serde_json::from_value(raw).unwrap();
        let student = StudentReport::from(report).normalize();

        assert_eq!(student.username, "teststudent4");
        assert_eq!(student.classifications.len(), 1);
        let only = &student.classifications["homework_total"];
        assert_eq!(only.student_username, "teststudent4");
        assert_eq!(only.definition_identifier, "homework_total");
        assert_eq!(only.timestamp, None);
    }
}
