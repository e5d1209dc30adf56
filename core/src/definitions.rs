//! Definition manager of a course.

use tracing::info;

use crate::client::{GradesClient, Semester};
use crate::definition::{Definition, DefinitionWithChildren};
use crate::dto::{
    create_definitions_payload, update_definitions_payload, DefinitionDto, HierarchyNodeDto,
    Normalize,
};
use crate::error::Result;
use crate::http::HttpRequest;

/// Identifies a definition to delete, either by value or by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRef(String);

impl DefinitionRef {
    pub fn identifier(&self) -> &str {
        &self.0
    }
}

impl From<&Definition> for DefinitionRef {
    fn from(definition: &Definition) -> Self {
        DefinitionRef(definition.identifier.clone())
    }
}

impl From<&DefinitionWithChildren> for DefinitionRef {
    fn from(definition: &DefinitionWithChildren) -> Self {
        DefinitionRef(definition.identifier().to_string())
    }
}

impl From<&str> for DefinitionRef {
    fn from(identifier: &str) -> Self {
        DefinitionRef(identifier.to_string())
    }
}

impl From<String> for DefinitionRef {
    fn from(identifier: String) -> Self {
        DefinitionRef(identifier)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Keep the children of a deleted definition instead of removing them
    /// with it.
    pub preserve_children: bool,
}

/// Reads and writes the definitions of one course.
pub struct CourseDefinitions<'a> {
    client: &'a GradesClient,
    course_code: &'a str,
}

impl<'a> CourseDefinitions<'a> {
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

    pub fn build_get_definition(&self, identifier: &str, semester_code: &str) -> HttpRequest {
        self.client
            .localized_get(self.course_url(&format!("/definitions/{identifier}")), semester_code)
    }

    pub fn build_definition_list(&self, semester_code: &str) -> HttpRequest {
        self.client
            .localized_get(self.course_url("/definitions"), semester_code)
    }

    pub fn build_definition_hierarchy(&self, semester_code: &str) -> HttpRequest {
        self.client
            .localized_get(self.course_url("/definition-hierarchy"), semester_code)
    }

    pub fn build_create_definitions(
        &self,
        definitions: &[Definition],
        semester_code: &str,
    ) -> Result<HttpRequest> {
        HttpRequest::post(self.course_url("/definition-hierarchy"))
            .query("semester", semester_code)
            .json(&create_definitions_payload(definitions))
    }

    pub fn build_update_definitions(&self, definitions: &[Definition]) -> Result<HttpRequest> {
        HttpRequest::put(self.course_url("/definitions"))
            .json(&update_definitions_payload(definitions))
    }

    pub fn build_delete_definition(
        &self,
        identifier: &str,
        semester_code: &str,
        options: DeleteOptions,
    ) -> HttpRequest {
        HttpRequest::delete(self.course_url(&format!("/definitions/{identifier}")))
            .query("preserve-children", options.preserve_children)
            .query("semester", semester_code)
    }

    pub async fn definition(
        &self,
        identifier: &str,
        semester: impl Into<Semester>,
    ) -> Result<Definition> {
        let semester_code = self.client.semester_code(semester).await?;
        let response = self
            .client
            .api()
            .execute(self.build_get_definition(identifier, &semester_code))
            .await?;
        let dto: DefinitionDto = response.json()?;
        Ok(dto.normalize())
    }

    pub async fn definition_list(&self, semester: impl Into<Semester>) -> Result<Vec<Definition>> {
        let semester_code = self.client.semester_code(semester).await?;
        let response = self
            .client
            .api()
            .execute(self.build_definition_list(&semester_code))
            .await?;
        let dtos: Vec<DefinitionDto> = response.json()?;
        Ok(dtos.into_iter().map(Normalize::normalize).collect())
    }

    /// Top-level definitions, each with its direct children.
    pub async fn definition_hierarchy(
        &self,
        semester: impl Into<Semester>,
    ) -> Result<Vec<DefinitionWithChildren>> {
        let semester_code = self.client.semester_code(semester).await?;
        let response = self
            .client
            .api()
            .execute(self.build_definition_hierarchy(&semester_code))
            .await?;
        let nodes: Vec<HierarchyNodeDto> = response.json()?;
        Ok(nodes.into_iter().map(Normalize::normalize).collect())
    }

    /// Creates all `definitions` in one call, grouped under their parents.
    pub async fn create_definitions(
        &self,
        definitions: &[Definition],
        semester: impl Into<Semester>,
    ) -> Result<()> {
        let semester_code = self.client.semester_code(semester).await?;
        let request = self.build_create_definitions(definitions, &semester_code)?;
        self.client.api().execute(request).await?;
        info!(
            course = self.course_code,
            count = definitions.len(),
            "created definitions"
        );
        Ok(())
    }

    /// Updates all `definitions` in one call. Children of the given
    /// definitions are not touched. The service identifies the semester
    /// from each definition's `semester_code`.
    pub async fn update_definitions(&self, definitions: &[Definition]) -> Result<()> {
        let request = self.build_update_definitions(definitions)?;
        self.client.api().execute(request).await?;
        info!(
            course = self.course_code,
            count = definitions.len(),
            "updated definitions"
        );
        Ok(())
    }

    /// Deletes each target with its own call, in order. The first failure
    /// is returned and the remaining targets are left alone.
    pub async fn delete_definitions<I>(
        &self,
        targets: I,
        semester: impl Into<Semester>,
        options: DeleteOptions,
    ) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<DefinitionRef>,
    {
        let semester_code = self.client.semester_code(semester).await?;
        for target in targets {
            let target = target.into();
            let request =
                self.build_delete_definition(target.identifier(), &semester_code, options);
            self.client.api().execute(request).await?;
            info!(
                course = self.course_code,
                definition = target.identifier(),
                "deleted definition"
            );
        }
        Ok(())
    }

    pub async fn delete_definition(
        &self,
        target: impl Into<DefinitionRef>,
        semester: impl Into<Semester>,
        options: DeleteOptions,
    ) -> Result<()> {
        self.delete_definitions([target.into()], semester, options)
            .await
    }
}
