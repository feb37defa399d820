use thiserror::Error;

use crate::model::{IdeaUpdate, NewIdea, SourceConfig};

/// Client-side validation failures, raised before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("title is required")]
    EmptyTitle,
    #[error("source name is required")]
    EmptySourceName,
    #[error("source path is required")]
    EmptySourcePath,
    #[error("a source named '{0}' already exists")]
    DuplicateSource(String),
    #[error("no source named '{0}'")]
    UnknownSource(String),
}

/// Build a create-idea body. Title and description are sent as typed.
pub fn new_idea(
    title: &str,
    description: &str,
    project_id: Option<&str>,
) -> Result<NewIdea, InputError> {
    if title.trim().is_empty() {
        return Err(InputError::EmptyTitle);
    }
    Ok(NewIdea {
        title: title.to_string(),
        description: description.to_string(),
        project_id: project_id.filter(|p| !p.is_empty()).map(str::to_string),
    })
}

pub fn idea_update(title: &str, description: &str) -> Result<IdeaUpdate, InputError> {
    if title.trim().is_empty() {
        return Err(InputError::EmptyTitle);
    }
    Ok(IdeaUpdate {
        title: title.to_string(),
        description: description.to_string(),
    })
}

/// The source list after adding `name` -> `path`.
pub fn add_source(
    current: &[SourceConfig],
    name: &str,
    path: &str,
) -> Result<Vec<SourceConfig>, InputError> {
    let name = name.trim();
    let path = path.trim();
    if name.is_empty() {
        return Err(InputError::EmptySourceName);
    }
    if path.is_empty() {
        return Err(InputError::EmptySourcePath);
    }
    if current.iter().any(|s| s.name == name) {
        return Err(InputError::DuplicateSource(name.to_string()));
    }
    let mut next = current.to_vec();
    next.push(SourceConfig {
        name: name.to_string(),
        path: path.to_string(),
    });
    Ok(next)
}

/// The source list after removing `name`.
pub fn remove_source(current: &[SourceConfig], name: &str) -> Result<Vec<SourceConfig>, InputError> {
    if !current.iter().any(|s| s.name == name) {
        return Err(InputError::UnknownSource(name.to_string()));
    }
    Ok(current.iter().filter(|s| s.name != name).cloned().collect())
}
