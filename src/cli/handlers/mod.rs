mod write;
mod watch;

pub use watch::cmd_watch;
pub use write::{cmd_idea, cmd_source};

use std::future::Future;

use serde::Serialize;

use crate::api::ApiClient;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::ClientConfig;
use crate::ops::board::{self, BoardFilter};

pub(crate) type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand against the configured server.
pub fn dispatch(command: Commands, api: &ApiClient, config: &ClientConfig, json: bool) -> CmdResult {
    match command {
        // Read commands
        Commands::Sources => cmd_sources(api, json),
        Commands::Changes(args) => cmd_changes(api, args, json),
        Commands::Board(args) => cmd_board(api, args, json),
        Commands::Show(args) => cmd_show(api, args, json),
        Commands::Specs(args) => cmd_specs(api, args, json),
        Commands::Spec(args) => cmd_spec(api, args, json),
        Commands::Ideas(args) => cmd_ideas(api, args, json),
        Commands::Config => cmd_config(api, json),

        // Write commands
        Commands::Idea(cmd) => cmd_idea(api, cmd, json),
        Commands::Source(cmd) => cmd_source(api, cmd, json),

        Commands::Watch(args) => cmd_watch(api, config, args, json),
    }
}

/// Drive one request to completion on a throwaway runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, std::io::Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn board_filter(args: &BoardArgs) -> BoardFilter {
    BoardFilter {
        source: args.source.clone(),
        show_archived: args.archived,
        search: args.search.clone().unwrap_or_default(),
        sort: args.sort,
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_sources(api: &ApiClient, json: bool) -> CmdResult {
    let sources = block_on(api.list_sources())??;
    if json {
        return print_json(&sources);
    }
    if sources.is_empty() {
        println!("{}", board::EmptyState::NoSources.message());
    }
    for source in &sources {
        println!("{}", format_source_line(source));
    }
    Ok(())
}

fn cmd_changes(api: &ApiClient, args: BoardArgs, json: bool) -> CmdResult {
    let changes = block_on(api.list_changes())??;
    let filter = board_filter(&args);
    let mut visible = board::filter_changes(&changes, &filter);
    board::sort_changes(&mut visible, filter.sort);

    if json {
        return print_json(&visible);
    }
    if visible.is_empty() {
        println!("No changes found");
    }
    for change in visible {
        println!("{}", format_change_line(change));
    }
    Ok(())
}

fn cmd_board(api: &ApiClient, args: BoardArgs, json: bool) -> CmdResult {
    let (sources, changes, ideas) = block_on(async {
        tokio::try_join!(api.list_sources(), api.list_changes(), api.list_ideas())
    })??;
    let filter = board_filter(&args);
    let board = board::derive_board(&changes, &ideas, &filter);

    if json {
        return print_json(&board);
    }
    if let Some(empty) = board::empty_state(&board, !sources.is_empty(), &filter) {
        println!("{}", empty.message());
        return Ok(());
    }
    print_lines(&format_board(&board));
    Ok(())
}

fn cmd_show(api: &ApiClient, args: IdArgs, json: bool) -> CmdResult {
    let detail = block_on(api.change(&args.id))??;
    if json {
        return print_json(&detail);
    }
    print_lines(&format_change_detail(&detail));
    Ok(())
}

fn cmd_specs(api: &ApiClient, args: SpecsArgs, json: bool) -> CmdResult {
    let specs = block_on(api.list_specs())??;
    let source = args.source.as_deref();
    if json {
        let visible: Vec<_> = specs
            .iter()
            .filter(|s| source.is_none_or(|id| id == s.source_id))
            .collect();
        return print_json(&visible);
    }
    print_lines(&format_spec_groups(&specs, source));
    Ok(())
}

fn cmd_spec(api: &ApiClient, args: IdArgs, json: bool) -> CmdResult {
    let spec = block_on(api.spec(&args.id))??;
    if json {
        return print_json(&spec);
    }
    print_lines(&format_spec_detail(&spec));
    Ok(())
}

fn cmd_ideas(api: &ApiClient, args: SpecsArgs, json: bool) -> CmdResult {
    let ideas = block_on(api.list_ideas())??;
    let filter = BoardFilter {
        source: args.source,
        ..BoardFilter::default()
    };
    let visible = board::filter_ideas(&ideas, &filter);
    if json {
        return print_json(&visible);
    }
    if visible.is_empty() {
        println!("No ideas yet");
    }
    for idea in visible {
        println!("{}", format_idea_line(idea));
    }
    Ok(())
}

fn cmd_config(api: &ApiClient, json: bool) -> CmdResult {
    let config = block_on(api.config())??;
    if json {
        return print_json(&config);
    }
    print_lines(&format_config(&config));
    Ok(())
}
