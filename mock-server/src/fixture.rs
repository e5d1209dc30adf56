//! Seed data: one course, `PI-ARB`, in semester `B202`.

use std::collections::{BTreeMap, HashSet};

use serde_json::json;

use crate::{
    ClassificationRecord, CourseInfo, DefinitionRecord, GroupRecord, Semesters, Store,
    StudentRecord, TextRecord,
};

pub const COURSE: &str = "PI-ARB";
pub const SEMESTER: &str = "B202";

fn definition(
    identifier: &str,
    parent: Option<&str>,
    classification_type: &str,
    names: (&str, &str),
    bounds: Option<(f64, f64, f64)>,
    expression: Option<&str>,
    value_type: &str,
) -> DefinitionRecord {
    let (minimum_value, minimum_required_value, maximum_value) = match bounds {
        Some((min, required, max)) => (Some(min), Some(required), Some(max)),
        None => (None, None, None),
    };
    DefinitionRecord {
        identifier: identifier.to_string(),
        parent_identifier: parent.map(str::to_string),
        course_code: COURSE.to_string(),
        semester_code: SEMESTER.to_string(),
        evaluation_type: if expression.is_some() { "EXPRESSION" } else { "MANUAL" }.to_string(),
        classification_type: classification_type.to_string(),
        value_type: value_type.to_string(),
        classification_text_dtos: vec![
            TextRecord {
                identifier: "cs".to_string(),
                name: names.0.to_string(),
            },
            TextRecord {
                identifier: "en".to_string(),
                name: names.1.to_string(),
            },
        ],
        hidden: false,
        minimum_value,
        minimum_required_value,
        maximum_value,
        expression: expression.map(str::to_string),
    }
}

fn student(username: &str, first: &str, last: &str, personal_number: Option<&str>) -> StudentRecord {
    StudentRecord {
        username: username.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{username}@fit.cvut.cz"),
        personal_number: personal_number.map(str::to_string),
    }
}

fn graded(entries: &[(&str, serde_json::Value, i64)]) -> BTreeMap<String, ClassificationRecord> {
    entries
        .iter()
        .map(|(definition, value, timestamp)| {
            (
                definition.to_string(),
                ClassificationRecord {
                    value: value.clone(),
                    note: Some(String::new()),
                    timestamp: Some(*timestamp),
                },
            )
        })
        .collect()
}

pub fn store() -> Store {
    let definitions = vec![
        definition(
            "homework_total",
            None,
            "HOMEWORK",
            ("Domácí úkoly celkem", "Homework total"),
            Some((0.0, 10.0, 20.0)),
            Some("number total = SUM(`homework\\d+`); total"),
            "NUMBER",
        ),
        definition(
            "homework1",
            Some("homework_total"),
            "HOMEWORK",
            ("Domácí úkol 1", "Homework 1"),
            Some((0.0, 0.0, 10.0)),
            None,
            "NUMBER",
        ),
        definition(
            "homework2",
            Some("homework_total"),
            "HOMEWORK",
            ("Domácí úkol 2", "Homework 2"),
            Some((0.0, 0.0, 10.0)),
            None,
            "NUMBER",
        ),
        definition(
            "semestral_test1",
            None,
            "SEMESTRAL_TEST",
            ("Semestrální test 1", "Semestral test 1"),
            Some((0.0, 10.0, 30.0)),
            None,
            "NUMBER",
        ),
        definition(
            "points_total",
            None,
            "POINTS_TOTAL",
            ("Body celkem", "Points total"),
            Some((0.0, 25.0, 50.0)),
            Some("number points = SUM(`homework_total`, `semestral_test\\d+`); points"),
            "NUMBER",
        ),
        definition(
            "mark",
            None,
            "FINAL_SCORE",
            ("Známka", "Mark"),
            None,
            Some("string passMark = MARK(points_total); passMark"),
            "STRING",
        ),
    ];

    let students = vec![
        student("teststudent1", "Joe", "Reacher", None),
        student("teststudent2", "Chuck", "Norris", Some("12345678")),
        student("teststudent4", "Tom", "Riddle", None),
    ];

    let groups = vec![
        GroupRecord {
            student_group_id: "ALL".to_string(),
            name: "{ALL_STUDENTS}".to_string(),
            description: "{ALL_STUDENTS}".to_string(),
            group_type: "ALL".to_string(),
            teachers: Vec::new(),
            members: students.iter().map(|s| s.username.clone()).collect(),
        },
        GroupRecord {
            student_group_id: "PAR101".to_string(),
            name: "101".to_string(),
            description: "Parallel 101".to_string(),
            group_type: "PARALLEL".to_string(),
            teachers: vec!["teacher1".to_string()],
            members: vec!["teststudent1".to_string(), "teststudent2".to_string()],
        },
    ];

    let mut classifications = BTreeMap::new();
    classifications.insert(
        "teststudent1".to_string(),
        graded(&[
            ("homework1", json!(7), 1619215245779),
            ("homework2", json!(9), 1619215245803),
            ("homework_total", json!(16), 1619215245803),
            ("semestral_test1", json!(25), 1619215245823),
            ("points_total", json!(41), 1619215327287),
            ("mark", json!("B"), 1619215327287),
        ]),
    );
    classifications.insert(
        "teststudent2".to_string(),
        graded(&[
            ("homework1", json!(10), 1619215245779),
            ("homework_total", json!(10), 1619215245779),
            ("mark", json!("F"), 1619215327287),
        ]),
    );
    classifications.insert(
        "teststudent4".to_string(),
        graded(&[
            ("homework1", json!(7), 1619215245779),
            ("homework_total", json!(7), 1619215245779),
            ("mark", json!("C"), 1619215327287),
        ]),
    );

    Store {
        reject_auth: false,
        issued_tokens: HashSet::new(),
        calls: Vec::new(),
        semesters: Semesters {
            prev: "B201".to_string(),
            current: SEMESTER.to_string(),
            next: "B211".to_string(),
        },
        course: CourseInfo {
            course_code: COURSE.to_string(),
            course_name: "Arbology".to_string(),
            completion: "EXAM".to_string(),
            credits: 4,
            classes_type: vec!["LECTURE".to_string(), "TUTORIAL".to_string()],
        },
        groups,
        students,
        definitions,
        classifications,
    }
}
