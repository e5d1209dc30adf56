//! Course-scoped access: course information, student groups and the
//! definition and classification managers.

use serde::{Deserialize, Serialize};

use crate::classifications::CourseClassifications;
use crate::client::{GradesClient, Semester};
use crate::definitions::CourseDefinitions;
use crate::error::Result;
use crate::http::HttpRequest;

/// How a course is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Completion {
    ClfdCredit,
    Credit,
    CreditExam,
    Defence,
    Exam,
    Nothing,
    Undefined,
}

/// Main information about a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    pub classes_type: Vec<String>,
    pub completion: Completion,
    pub course_code: String,
    pub course_name: String,
    pub credits: u32,
}

/// A named cohort of students within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGroup {
    pub student_group_id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: String,
}

/// Handle to one course. Cheap to create; holds no fetched data.
pub struct Course<'a> {
    client: &'a GradesClient,
    code: String,
}

impl<'a> Course<'a> {
    pub(crate) fn new(client: &'a GradesClient, code: String) -> Self {
        Self { client, code }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn definitions(&self) -> CourseDefinitions<'_> {
        CourseDefinitions::new(self.client, &self.code)
    }

    pub fn classifications(&self) -> CourseClassifications<'_> {
        CourseClassifications::new(self.client, &self.code)
    }

    pub fn build_course_info(&self, semester_code: &str) -> HttpRequest {
        let url = self
            .client
            .api()
            .url_for_request(&format!("/public/courses/{}/information", self.code));
        self.client.localized_get(url, semester_code)
    }

    /// Groups are served under `/public/course/` (singular).
    pub fn build_student_groups(
        &self,
        semester_code: &str,
        teacher_username: Option<&str>,
    ) -> HttpRequest {
        let url = self
            .client
            .api()
            .url_for_request(&format!("/public/course/{}/student-groups", self.code));
        let request = self.client.localized_get(url, semester_code);
        match teacher_username {
            Some(teacher) => request.query("teacherUsername", teacher),
            None => request,
        }
    }

    /// Name, completion, credits and class types of the course.
    pub async fn course_info(&self, semester: impl Into<Semester>) -> Result<CourseInfo> {
        let semester_code = self.client.semester_code(semester).await?;
        let response = self
            .client
            .api()
            .execute(self.build_course_info(&semester_code))
            .await?;
        response.json()
    }

    /// Student groups of the course; all of them unless a teacher is given.
    pub async fn student_groups(
        &self,
        semester: impl Into<Semester>,
        teacher_username: Option<&str>,
    ) -> Result<Vec<StudentGroup>> {
        let semester_code = self.client.semester_code(semester).await?;
        let response = self
            .client
            .api()
            .execute(self.build_student_groups(&semester_code, teacher_username))
            .await?;
        response.json()
    }
}
