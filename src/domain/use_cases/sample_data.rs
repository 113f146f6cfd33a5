use serde::{Deserialize, Serialize};

use crate::{
    entities::{project::NewProject, service::NewService, session::Session},
    errors::{AppError, DataError},
    repositories::document_store::DocumentStore,
    use_cases::content::DataAccess,
};

const SAMPLE_DATA: &str = include_str!("../../../seed/sample_data.json");

#[derive(Debug, Deserialize)]
struct SampleData {
    services: Vec<NewService>,
    projects: Vec<NewProject>,
}

#[derive(Debug, Serialize)]
pub struct SampleDataReport {
    pub services: Vec<String>,
    pub projects: Vec<String>,
}

/// Adds the demo services and project through the regular write path.
///
/// Stops at the first failed write; documents added before it stay.
#[tracing::instrument(skip(access, session))]
pub async fn populate_sample_data<S: DocumentStore>(
    access: &DataAccess<S>,
    session: &Session,
) -> Result<SampleDataReport, AppError> {
    let sample: SampleData = serde_json::from_str(SAMPLE_DATA)
        .map_err(|e| AppError::InternalError(format!("Invalid sample data: {}", e)))?;

    let mut report = SampleDataReport {
        services: Vec::with_capacity(sample.services.len()),
        projects: Vec::with_capacity(sample.projects.len()),
    };

    for service in &sample.services {
        report.services.push(access.services().add(session, service).await.map_err(logged)?);
    }
    for project in &sample.projects {
        report.projects.push(access.projects().add(session, project).await.map_err(logged)?);
    }

    tracing::info!(
        services = report.services.len(),
        projects = report.projects.len(),
        "Sample data populated"
    );
    Ok(report)
}

fn logged(err: DataError) -> AppError {
    tracing::error!("Populating sample data failed: {}", err);
    err.into()
}
