//! In-memory stand-in for the grades classification service.
//!
//! Serves the token endpoint and every `/public/...` endpoint the client
//! uses, backed by a seeded [`Store`]. Tokens are single use: each one is
//! consumed by the request that presents it. Every request, including token
//! requests, is appended to [`Store::calls`] so tests can assert on what the
//! client actually sent.

pub mod fixture;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextRecord {
    pub identifier: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionRecord {
    pub identifier: String,
    pub parent_identifier: Option<String>,
    pub course_code: String,
    pub semester_code: String,
    pub evaluation_type: String,
    pub classification_type: String,
    pub value_type: String,
    pub classification_text_dtos: Vec<TextRecord>,
    pub hidden: bool,
    pub minimum_value: Option<f64>,
    pub minimum_required_value: Option<f64>,
    pub maximum_value: Option<f64>,
    pub expression: Option<String>,
}

impl DefinitionRecord {
    fn parent(&self) -> Option<&str> {
        self.parent_identifier.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub personal_number: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub value: Value,
    pub note: Option<String>,
    pub timestamp: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub student_group_id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: String,
    #[serde(skip)]
    pub teachers: Vec<String>,
    #[serde(skip)]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    pub course_code: String,
    pub course_name: String,
    pub completion: String,
    pub credits: u32,
    pub classes_type: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Semesters {
    pub prev: String,
    pub current: String,
    pub next: String,
}

/// One request as the server received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub query: String,
    pub token: Option<String>,
}

impl RecordedCall {
    /// Value of query parameter `key`, undecoded.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Debug)]
pub struct Store {
    /// When set, the token endpoint answers 401.
    pub reject_auth: bool,
    pub issued_tokens: HashSet<String>,
    pub calls: Vec<RecordedCall>,
    pub semesters: Semesters,
    pub course: CourseInfo,
    pub groups: Vec<GroupRecord>,
    pub students: Vec<StudentRecord>,
    pub definitions: Vec<DefinitionRecord>,
    /// username -> definition identifier -> classification
    pub classifications: BTreeMap<String, BTreeMap<String, ClassificationRecord>>,
}

impl Store {
    pub fn definition(&self, identifier: &str) -> Option<&DefinitionRecord> {
        self.definitions.iter().find(|d| d.identifier == identifier)
    }

    fn group_members(&self, group: &str) -> Option<Vec<&StudentRecord>> {
        let group = self.groups.iter().find(|g| g.student_group_id == group)?;
        Some(
            self.students
                .iter()
                .filter(|s| group.members.contains(&s.username))
                .collect(),
        )
    }

    fn hierarchy_node(&self, definition: &DefinitionRecord) -> Value {
        let children: Vec<Value> = self
            .definitions
            .iter()
            .filter(|d| d.parent() == Some(definition.identifier.as_str()))
            .map(|child| self.hierarchy_node(child))
            .collect();
        let mut node = json!(definition);
        node["children"] = Value::Array(children);
        node
    }

    /// Removes `identifier` and, unless `preserve_children`, its whole
    /// subtree. Preserved children move up to the removed node's parent.
    fn remove_definition(&mut self, identifier: &str, preserve_children: bool) {
        let Some(position) = self.definitions.iter().position(|d| d.identifier == identifier)
        else {
            return;
        };
        let removed = self.definitions.remove(position);
        let children: Vec<String> = self
            .definitions
            .iter()
            .filter(|d| d.parent() == Some(identifier))
            .map(|d| d.identifier.clone())
            .collect();
        for child in children {
            if preserve_children {
                if let Some(d) = self.definitions.iter_mut().find(|d| d.identifier == child) {
                    d.parent_identifier = removed.parent_identifier.clone();
                }
            } else {
                self.remove_definition(&child, false);
            }
        }
        for graded in self.classifications.values_mut() {
            graded.remove(identifier);
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Seeded store, see [`fixture`].
pub fn seeded() -> Db {
    Arc::new(RwLock::new(fixture::store()))
}

pub fn app(db: Db) -> Router {
    let public = Router::new()
        .route("/public/semester-code", get(semester_code))
        .route("/public/courses/{course}/information", get(course_info))
        .route("/public/course/{course}/student-groups", get(student_groups))
        .route(
            "/public/courses/{course}/student-classifications",
            put(save_classifications),
        )
        .route(
            "/public/courses/{course}/student-classifications/{username}",
            get(student_classifications),
        )
        .route(
            "/public/courses/{course}/group/{group}/student-classifications",
            get(group_classifications),
        )
        .route(
            "/public/courses/{course}/group/{group}/student-classifications/{definition}",
            get(group_classifications_for_definition),
        )
        .route(
            "/public/courses/{course}/definitions",
            get(list_definitions).put(update_definitions),
        )
        .route(
            "/public/courses/{course}/definitions/{definition}",
            get(get_definition).delete(delete_definition),
        )
        .route(
            "/public/courses/{course}/definition-hierarchy",
            get(definition_hierarchy).post(create_definitions),
        )
        .route_layer(middleware::from_fn_with_state(db.clone(), require_bearer));

    Router::new()
        .route("/oauth/token", post(issue_token))
        .merge(public)
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "grades mock listening");
    }
    axum::serve(listener, app(db)).await
}

fn record(store: &mut Store, request: &Request, token: Option<String>) {
    store.calls.push(RecordedCall {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().unwrap_or_default().to_string(),
        token,
    });
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

// --- authentication ---

#[derive(Deserialize)]
struct TokenQuery {
    grant_type: String,
    scope: String,
}

async fn issue_token(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store.calls.push(RecordedCall {
        method: "POST".to_string(),
        path: "/oauth/token".to_string(),
        query: format!("grant_type={}&scope={}", query.grant_type, query.scope),
        token: None,
    });

    let has_basic = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if store.reject_auth || !has_basic {
        debug!(has_basic, "token request rejected");
        return Err(StatusCode::UNAUTHORIZED);
    }
    if query.grant_type != "client_credentials" {
        return Err(StatusCode::BAD_REQUEST);
    }

    let token = Uuid::new_v4().to_string();
    store.issued_tokens.insert(token.clone());
    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600,
        "scope": query.scope,
    })))
}

async fn require_bearer(
    State(db): State<Db>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    {
        let mut store = db.write().await;
        record(&mut store, &request, token.clone());
        let valid = token
            .as_ref()
            .is_some_and(|t| store.issued_tokens.remove(t));
        if !valid {
            debug!(path = request.uri().path(), "missing or spent bearer token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }
    Ok(next.run(request).await)
}

// --- semesters and course ---

#[derive(Deserialize)]
struct SemesterQuery {
    semester: String,
}

fn is_semester_code(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && s.len() == 4
        && chars.all(|c| c.is_ascii_digit())
}

async fn semester_code(
    State(db): State<Db>,
    Query(query): Query<SemesterQuery>,
) -> Result<Json<String>, StatusCode> {
    let store = db.read().await;
    let code = match query.semester.as_str() {
        "current" => store.semesters.current.clone(),
        "prev" => store.semesters.prev.clone(),
        "next" => store.semesters.next.clone(),
        code if is_semester_code(code) => code.to_string(),
        _ => return Err(StatusCode::BAD_REQUEST),
    };
    Ok(Json(code))
}

/// Write calls must name a literal semester code, never an alias.
fn check_semester(semester: &str) -> Result<(), StatusCode> {
    if is_semester_code(semester) {
        Ok(())
    } else {
        Err(StatusCode::BAD_REQUEST)
    }
}

fn check_course(store: &Store, course: &str) -> Result<(), StatusCode> {
    if store.course.course_code == course {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn course_info(
    State(db): State<Db>,
    Path(course): Path<String>,
) -> Result<Json<CourseInfo>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    Ok(Json(store.course.clone()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupsQuery {
    teacher_username: Option<String>,
}

async fn student_groups(
    State(db): State<Db>,
    Path(course): Path<String>,
    Query(query): Query<GroupsQuery>,
) -> Result<Json<Vec<GroupRecord>>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    let groups = store
        .groups
        .iter()
        .filter(|g| match &query.teacher_username {
            Some(teacher) => g.teachers.contains(teacher),
            None => true,
        })
        .cloned()
        .collect();
    Ok(Json(groups))
}

// --- classifications ---

fn student_fields(student: &StudentRecord) -> Value {
    json!({
        "userId": null,
        "username": student.username,
        "firstName": student.first_name,
        "lastName": student.last_name,
        "fullName": format!("{} {}", student.first_name, student.last_name),
        "email": student.email,
        "personalNumber": student.personal_number,
    })
}

async fn student_classifications(
    State(db): State<Db>,
    Path((course, username)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    let student = store
        .students
        .iter()
        .find(|s| s.username == username)
        .ok_or(StatusCode::NOT_FOUND)?;
    let graded = store.classifications.get(&username);

    let full_dtos: Vec<Value> = store
        .definitions
        .iter()
        .filter_map(|definition| {
            let classification = graded?.get(&definition.identifier)?;
            let mut full = json!(definition);
            full["value"] = classification.value.clone();
            full["note"] = json!(classification.note);
            full["lastUpdated"] = json!(classification.timestamp);
            Some(full)
        })
        .collect();

    let mut report = student_fields(student);
    report["studentClassificationFullDtos"] = Value::Array(full_dtos);
    Ok(Json(report))
}

async fn group_classifications(
    State(db): State<Db>,
    Path((course, group)): Path<(String, String)>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    let members = store.group_members(&group).ok_or(StatusCode::NOT_FOUND)?;

    let reports = members
        .into_iter()
        .map(|student| {
            let map: serde_json::Map<String, Value> = store
                .classifications
                .get(&student.username)
                .into_iter()
                .flatten()
                .map(|(definition, c)| {
                    let entry = json!({
                        "id": null,
                        "timestamp": c.timestamp,
                        "value": c.value,
                        "note": c.note,
                        "authorUsername": "teacher1",
                    });
                    (definition.clone(), entry)
                })
                .collect();
            let mut report = student_fields(student);
            report["classificationMap"] = Value::Object(map);
            report
        })
        .collect();
    Ok(Json(reports))
}

async fn group_classifications_for_definition(
    State(db): State<Db>,
    Path((course, group, definition)): Path<(String, String, String)>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    store.definition(&definition).ok_or(StatusCode::NOT_FOUND)?;
    let members = store.group_members(&group).ok_or(StatusCode::NOT_FOUND)?;

    let records = members
        .into_iter()
        .filter_map(|student| {
            let c = store
                .classifications
                .get(&student.username)?
                .get(&definition)?;
            Some(json!({
                "id": null,
                "timestamp": c.timestamp,
                "value": c.value,
                "note": c.note,
                "authorUsername": null,
                "studentUsername": student.username,
                "classificationIdentifier": definition,
                "firstName": student.first_name,
                "lastName": student.last_name,
                "email": student.email,
                "personalNumber": student.personal_number,
                "parallelCodes": {},
            }))
        })
        .collect();
    Ok(Json(records))
}

#[derive(Deserialize)]
struct SaveQuery {
    notify: bool,
    semester: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedClassification {
    classification_identifier: String,
    student_username: String,
    value: Value,
    note: Option<String>,
    timestamp: Option<i64>,
}

async fn save_classifications(
    State(db): State<Db>,
    Path(course): Path<String>,
    Query(query): Query<SaveQuery>,
    Json(input): Json<Vec<SavedClassification>>,
) -> Result<Json<Value>, StatusCode> {
    check_semester(&query.semester)?;
    let mut store = db.write().await;
    check_course(&store, &course)?;
    debug!(count = input.len(), notify = query.notify, "saving classifications");
    for saved in &input {
        let known_student = store
            .students
            .iter()
            .any(|s| s.username == saved.student_username);
        if !known_student || store.definition(&saved.classification_identifier).is_none() {
            return Err(StatusCode::BAD_REQUEST);
        }
    }
    for saved in input {
        store
            .classifications
            .entry(saved.student_username)
            .or_default()
            .insert(
                saved.classification_identifier,
                ClassificationRecord {
                    value: saved.value,
                    note: saved.note,
                    timestamp: saved.timestamp.or_else(|| Some(now_millis())),
                },
            );
    }
    Ok(Json(json!({})))
}

// --- definitions ---

async fn list_definitions(
    State(db): State<Db>,
    Path(course): Path<String>,
) -> Result<Json<Vec<DefinitionRecord>>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    Ok(Json(store.definitions.clone()))
}

async fn get_definition(
    State(db): State<Db>,
    Path((course, definition)): Path<(String, String)>,
) -> Result<Json<DefinitionRecord>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    store
        .definition(&definition)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn definition_hierarchy(
    State(db): State<Db>,
    Path(course): Path<String>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let store = db.read().await;
    check_course(&store, &course)?;
    let roots = store
        .definitions
        .iter()
        .filter(|d| d.parent().is_none())
        .map(|root| store.hierarchy_node(root))
        .collect();
    Ok(Json(roots))
}

async fn create_definitions(
    State(db): State<Db>,
    Path(course): Path<String>,
    Query(query): Query<SemesterQuery>,
    Json(input): Json<BTreeMap<String, Vec<DefinitionRecord>>>,
) -> Result<Json<Value>, StatusCode> {
    check_semester(&query.semester)?;
    let mut store = db.write().await;
    check_course(&store, &course)?;
    for definition in input.values().flatten() {
        if store.definition(&definition.identifier).is_some() {
            return Err(StatusCode::BAD_REQUEST);
        }
    }
    for (parent, definitions) in input {
        for mut definition in definitions {
            definition.parent_identifier = Some(parent.clone()).filter(|p| !p.is_empty());
            store.definitions.push(definition);
        }
    }
    Ok(Json(json!({})))
}

async fn update_definitions(
    State(db): State<Db>,
    Path(course): Path<String>,
    Json(input): Json<BTreeMap<String, DefinitionRecord>>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    check_course(&store, &course)?;
    if input.keys().any(|id| store.definition(id).is_none()) {
        return Err(StatusCode::NOT_FOUND);
    }
    for (identifier, update) in input {
        if let Some(existing) = store
            .definitions
            .iter_mut()
            .find(|d| d.identifier == identifier)
        {
            let parent = existing.parent_identifier.clone();
            *existing = update;
            existing.parent_identifier = parent;
        }
    }
    Ok(Json(json!({})))
}

#[derive(Deserialize)]
struct DeleteQuery {
    #[serde(rename = "preserve-children")]
    preserve_children: bool,
    semester: String,
}

async fn delete_definition(
    State(db): State<Db>,
    Path((course, definition)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, StatusCode> {
    check_semester(&query.semester)?;
    let mut store = db.write().await;
    check_course(&store, &course)?;
    store.definition(&definition).ok_or(StatusCode::NOT_FOUND)?;
    store.remove_definition(&definition, query.preserve_children);
    Ok(Json(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semester_code_shape() {
        assert!(is_semester_code("B202"));
        assert!(!is_semester_code("b202"));
        assert!(!is_semester_code("B20"));
        assert!(!is_semester_code("current"));
    }

    #[test]
    fn recorded_call_reads_query_params() {
        let call = RecordedCall {
            method: "DELETE".to_string(),
            path: "/x".to_string(),
            query: "preserve-children=false&semester=B202".to_string(),
            token: None,
        };
        assert_eq!(call.query_param("preserve-children"), Some("false"));
        assert_eq!(call.query_param("semester"), Some("B202"));
        assert_eq!(call.query_param("lang"), None);
    }

    #[test]
    fn remove_definition_drops_subtree() {
        let mut store = fixture::store();
        store.remove_definition("homework_total", false);
        assert!(store.definition("homework_total").is_none());
        assert!(store.definition("homework1").is_none());
        assert!(store.definition("homework2").is_none());
        assert!(!store.classifications["teststudent1"].contains_key("homework1"));
    }

    #[test]
    fn remove_definition_can_preserve_children() {
        let mut store = fixture::store();
        store.remove_definition("homework_total", true);
        let child = store.definition("homework1").unwrap();
        assert_eq!(child.parent_identifier, None);
    }

    #[test]
    fn hierarchy_node_nests_children() {
        let store = fixture::store();
        let root = store.definition("homework_total").unwrap();
        let node = store.hierarchy_node(root);
        let children = node["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["identifier"], "homework1");
        assert_eq!(children[0]["children"], json!([]));
    }
}
