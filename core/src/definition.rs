//! Definitions: the gradeable items of a course's classification scheme.

use serde::{Deserialize, Serialize};

use crate::dto::{DefinitionDto, HierarchyNodeDto, Normalize};

/// Kind of gradeable item, as the service enumerates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationType {
    Homework,
    TutorialTask,
    Activity,
    SemestralTest,
    Assessment,
    ExamTest,
    PreExamTest,
    OralExam,
    PointsTotal,
    FinalScore,
    Other,
    OtherSemester,
    OtherExams,
    TutorialAbsence,
    Quiz,
    CorrectionTest,
    BonusPoints,
    LectureTask,
    ContestHomework,
    SemestralWork,
    CodeReview,
    TutorialAttendance,
}

/// Whether a value is entered by a teacher or computed from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationType {
    Manual,
    Expression,
}

/// The type every classification value of a definition must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Number,
    String,
    Boolean,
}

/// Czech and English display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedNames {
    pub cs: String,
    pub en: String,
}

impl LocalizedNames {
    pub fn new(cs: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            cs: cs.into(),
            en: en.into(),
        }
    }
}

/// A single definition from a course's definition hierarchy.
///
/// `identifier` is unique within a course and semester. An empty
/// `parent_identifier` marks a root. `expression` is expected to be present
/// exactly when `evaluation_type` is `Expression`; the type does not enforce
/// it (see [`Definition::expression_is_consistent`]).
///
/// The numeric bounds are optional because the service reports `null` for
/// them on expression-evaluated definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub identifier: String,
    pub parent_identifier: String,
    pub names: LocalizedNames,
    pub course_code: String,
    pub semester_code: String,
    pub classification_type: ClassificationType,
    pub evaluation_type: EvaluationType,
    pub minimum_value: Option<f64>,
    pub maximum_value: Option<f64>,
    pub minimum_required_value: Option<f64>,
    pub expression: Option<String>,
    pub value_type: ValueType,
    pub hidden: bool,
}

impl Definition {
    /// A visible, manually evaluated root definition with no bounds.
    pub fn manual(
        identifier: impl Into<String>,
        names: LocalizedNames,
        course_code: impl Into<String>,
        semester_code: impl Into<String>,
        classification_type: ClassificationType,
        value_type: ValueType,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            parent_identifier: String::new(),
            names,
            course_code: course_code.into(),
            semester_code: semester_code.into(),
            classification_type,
            evaluation_type: EvaluationType::Manual,
            minimum_value: None,
            maximum_value: None,
            minimum_required_value: None,
            expression: None,
            value_type,
            hidden: false,
        }
    }

    pub fn parse(dto: DefinitionDto) -> Self {
        dto.normalize()
    }

    pub fn serialize(&self) -> DefinitionDto {
        DefinitionDto::from(self)
    }

    pub fn is_root(&self) -> bool {
        self.parent_identifier.is_empty()
    }

    /// True when an expression is present exactly for expression-evaluated
    /// definitions.
    pub fn expression_is_consistent(&self) -> bool {
        let has_expression = self
            .expression
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        has_expression == (self.evaluation_type == EvaluationType::Expression)
    }
}

/// A definition together with its direct children.
///
/// Only one level is modelled: children carry no children of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionWithChildren {
    pub definition: Definition,
    pub children: Vec<Definition>,
}

impl DefinitionWithChildren {
    pub fn new(definition: Definition) -> Self {
        Self {
            definition,
            children: Vec::new(),
        }
    }

    pub fn parse(dto: HierarchyNodeDto) -> Self {
        dto.normalize()
    }

    pub fn identifier(&self) -> &str {
        &self.definition.identifier
    }

    /// Appends `child`, re-parenting it under this definition.
    pub fn add_child(&mut self, mut child: Definition) {
        child.parent_identifier = self.definition.identifier.clone();
        self.children.push(child);
    }

    pub fn into_parts(self) -> (Definition, Vec<Definition>) {
        (self.definition, self.children)
    }
}

impl From<Definition> for DefinitionWithChildren {
    fn from(definition: Definition) -> Self {
        Self::new(definition)
    }
}

impl std::ops::Deref for DefinitionWithChildren {
    type Target = Definition;

    fn deref(&self) -> &Definition {
        &self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn homework(identifier: &str) -> Definition {
        Definition::manual(
            identifier,
            LocalizedNames::new("DU", "HW"),
            "PI-ARB",
            "B202",
            ClassificationType::Homework,
            ValueType::Number,
        )
    }

    #[test]
    fn classification_type_uses_wire_names() {
        let json = serde_json::to_value(ClassificationType::TutorialAttendance).unwrap();
        assert_eq!(json, "TUTORIAL_ATTENDANCE");
        let parsed: ClassificationType = serde_json::from_str("\"PRE_EXAM_TEST\"").unwrap();
        assert_eq!(parsed, ClassificationType::PreExamTest);
        assert!(serde_json::from_str::<ClassificationType>("\"HOMEWORKS\"").is_err());
    }

    #[test]
    fn add_child_reparents() {
        let mut parent = DefinitionWithChildren::new(homework("homework_total"));
        let mut child = homework("homework1");
        child.parent_identifier = "elsewhere".to_string();

        parent.add_child(child);

        assert_eq!(parent.children.len(), 1);
        assert_eq!(parent.children[0].parent_identifier, "homework_total");
        assert!(parent.is_root());
    }

    #[test]
    fn expression_consistency() {
        let mut def = homework("points_total");
        assert!(def.expression_is_consistent());

        def.evaluation_type = EvaluationType::Expression;
        assert!(!def.expression_is_consistent());

        def.expression = Some("SUM(`homework\\d+`)".to_string());
        assert!(def.expression_is_consistent());

        def.evaluation_type = EvaluationType::Manual;
        assert!(!def.expression_is_consistent());
    }

    fn wire(identifier: &str, parent: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "identifier": identifier,
            "parentIdentifier": parent,
            "courseCode": "PI-ARB",
            "semesterCode": "B202",
            "evaluationType": "EXPRESSION",
            "classificationType": "FINAL_SCORE",
            "valueType": "STRING",
            "classificationTextDtos": [{"identifier": "en", "name": "Mark"}],
            "hidden": true,
            "minimumValue": null,
            "minimumRequiredValue": null,
            "maximumValue": null,
            "expression": "string m = MARK(points_total); m"
        })
    }

    #[test]
    fn parse_normalizes_definition_record() {
        let dto: DefinitionDto = serde_json::from_value(wire("mark", None)).unwrap();

        let def = Definition::parse(dto);

        assert_eq!(def.identifier, "mark");
        assert!(def.is_root());
        assert_eq!(def.names, LocalizedNames::new("", "Mark"));
        assert_eq!(def.classification_type, ClassificationType::FinalScore);
        assert_eq!(def.value_type, ValueType::String);
        assert_eq!(def.minimum_value, None);
        assert!(def.hidden);
        assert!(def.expression_is_consistent());
    }

    #[test]
    fn parse_with_children_keeps_order_and_parents() {
        let mut node = wire("homework_total", None);
        node["children"] = serde_json::json!([
            wire("homework2", Some("homework_total")),
            wire("homework1", Some("homework_total")),
        ]);
        let dto: HierarchyNodeDto = serde_json::from_value(node).unwrap();

        let parent = DefinitionWithChildren::parse(dto);

        assert_eq!(parent.identifier(), "homework_total");
        let ids: Vec<&str> = parent
            .children
            .iter()
            .map(|c| c.identifier.as_str())
            .collect();
        assert_eq!(ids, ["homework2", "homework1"]);
        assert!(parent
            .children
            .iter()
            .all(|c| c.parent_identifier == "homework_total"));
    }

    #[test]
    fn parse_with_children_accepts_leaf_without_children_field() {
        let dto: HierarchyNodeDto = serde_json::from_value(wire("mark", None)).unwrap();
        let leaf = DefinitionWithChildren::parse(dto);
        assert!(leaf.children.is_empty());
        assert_eq!(leaf.definition.identifier, "mark");
    }
}
