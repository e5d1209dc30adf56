//! Classification manager of a course.

use tracing::info;

use crate::classification::{Classification, Student};
use crate::client::{GradesClient, Semester};
use crate::dto::{
    save_classifications_payload, GroupDefinitionReport, GroupStudentReport, Normalize,
    SingleStudentReport,
};
use crate::error::Result;
use crate::http::HttpRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Ask the service to notify affected students.
    pub notify: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { notify: true }
    }
}

/// Reads and saves the classifications of one course.
pub struct CourseClassifications<'a> {
    client: &'a GradesClient,
    course_code: &'a str,
}

impl<'a> CourseClassifications<'a> {
    pub(crate) fn new(client: &'a GradesClient, course_code: &'a str) -> Self {
        Self {
            client,
            course_code,
        }
    }

    fn course_url(&self, tail: &str) -> String {
        self.client
            .api()
            .url_for_request(&format!("/public/courses/{}{}", self.course_code, tail))
    }

    pub fn build_student_classifications(
        &self,
        username: &str,
        semester_code: &str,
    ) -> HttpRequest {
        let url = self.course_url(&format!("/student-classifications/{username}"));
        self.client.localized_get(url, semester_code)
    }

    pub fn build_group_classifications(&self, group: &str, semester_code: &str) -> HttpRequest {
        let url = self.course_url(&format!("/group/{group}/student-classifications"));
        self.client.localized_get(url, semester_code)
    }

    pub fn build_group_classifications_for_definition(
        &self,
        group: &str,
        definition_identifier: &str,
        semester_code: &str,
    ) -> HttpRequest {
        let url = self.course_url(&format!(
            "/group/{group}/student-classifications/{definition_identifier}"
        ));
        self.client.localized_get(url, semester_code)
    }

    pub fn build_save_classifications(
        &self,
        classifications: &[Classification],
        semester_code: &str,
        options: SaveOptions,
    ) -> Result<HttpRequest> {
        HttpRequest::put(self.course_url("/student-classifications"))
            .query("notify", options.notify)
            .query("semester", semester_code)
            .json(&save_classifications_payload(classifications))
    }

    /// All classifications of one student.
    pub async fn student_classifications(
        &self,
        username: &str,
        semester: impl Into<Semester>,
    ) -> Result<Student> {
        let semester_code = self.client.semester_code(semester).await?;
        let response = self
            .client
            .api()
            .execute(self.build_student_classifications(username, &semester_code))
            .await?;
        let report: SingleStudentReport = response.json()?;
        Ok(report.normalize())
    }

    /// Students of `group` (e.g. `ALL`, `MY_PARALLELS`) with their
    /// classifications.
    pub async fn group_classifications(
        &self,
        group: &str,
        semester: impl Into<Semester>,
    ) -> Result<Vec<Student>> {
        let semester_code = self.client.semester_code(semester).await?;
        let response = self
            .client
            .api()
            .execute(self.build_group_classifications(group, &semester_code))
            .await?;
        let reports: Vec<GroupStudentReport> = response.json()?;
        Ok(reports.into_iter().map(Normalize::normalize).collect())
    }

    /// Students of `group`, each with only the classification of
    /// `definition_identifier`.
    pub async fn group_classifications_for_definition(
        &self,
        group: &str,
        definition_identifier: &str,
        semester: impl Into<Semester>,
    ) -> Result<Vec<Student>> {
        let semester_code = self.client.semester_code(semester).await?;
        let request = self.build_group_classifications_for_definition(
            group,
            definition_identifier,
            &semester_code,
        );
        let response = self.client.api().execute(request).await?;
        let reports: Vec<GroupDefinitionReport> = response.json()?;
        Ok(reports.into_iter().map(Normalize::normalize).collect())
    }

    /// Saves all `classifications` in one call.
    pub async fn save_classifications(
        &self,
        classifications: &[Classification],
        semester: impl Into<Semester>,
        options: SaveOptions,
    ) -> Result<()> {
        let semester_code = self.client.semester_code(semester).await?;
        let request = self.build_save_classifications(classifications, &semester_code, options)?;
        self.client.api().execute(request).await?;
        info!(
            course = self.course_code,
            count = classifications.len(),
            notify = options.notify,
            "saved classifications"
        );
        Ok(())
    }
}
