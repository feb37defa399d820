use serde::Serialize;

use crate::api::ApiClient;
use crate::cli::commands::{IdeaAction, IdeaCmd, SourceAction, SourceCmd};
use crate::model::{Idea, ServerConfig};
use crate::ops::validate;

use super::{CmdResult, block_on, print_json};

#[derive(Serialize)]
struct Deleted<'a> {
    deleted: &'a str,
}

pub fn cmd_idea(api: &ApiClient, cmd: IdeaCmd, json: bool) -> CmdResult {
    match cmd.action {
        IdeaAction::Add {
            title,
            description,
            project,
        } => {
            let body = validate::new_idea(&title, &description, project.as_deref())?;
            let idea = block_on(api.create_idea(&body))??;
            tracing::info!(id = %idea.id, "idea created");
            if json {
                return print_json(&idea);
            }
            println!("created idea {}", idea.id);
        }
        IdeaAction::Edit {
            id,
            title,
            description,
        } => {
            let idea = block_on(edit_idea(api, &id, title.as_deref(), description.as_deref()))??;
            tracing::info!(id = %idea.id, "idea updated");
            if json {
                return print_json(&idea);
            }
            println!("updated idea {}", idea.id);
        }
        IdeaAction::Rm { id } => {
            block_on(api.delete_idea(&id))??;
            tracing::info!(%id, "idea deleted");
            if json {
                return print_json(&Deleted { deleted: &id });
            }
            println!("deleted idea {}", id);
        }
    }
    Ok(())
}

pub fn cmd_source(api: &ApiClient, cmd: SourceCmd, json: bool) -> CmdResult {
    let config = block_on(save_sources(api, &cmd.action))??;

    if json {
        return print_json(&config);
    }
    match cmd.action {
        SourceAction::Add { name, .. } => println!("added source {}", name.trim()),
        SourceAction::Rm { name } => println!("removed source {}", name),
    }
    Ok(())
}

/// Omitted fields keep the idea's current value.
async fn edit_idea(
    api: &ApiClient,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Idea, Box<dyn std::error::Error>> {
    let ideas = api.list_ideas().await?;
    let current = ideas
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| format!("no idea with id '{id}'"))?;
    let body = validate::idea_update(
        title.unwrap_or(&current.title),
        description.unwrap_or(&current.description),
    )?;
    Ok(api.update_idea(id, &body).await?)
}

/// Source edits replace the whole list, so read the current one first.
async fn save_sources(
    api: &ApiClient,
    action: &SourceAction,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let current = api.config().await?;
    let next = match action {
        SourceAction::Add { name, path } => validate::add_source(&current.sources, name, path)?,
        SourceAction::Rm { name } => validate::remove_source(&current.sources, name)?,
    };
    Ok(api.update_sources(&next).await?)
}
