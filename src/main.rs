use clap::Parser;
use infraview::adapters::graphql_client::GraphqlClient;
use infraview::cli::{BranchCommand, Cli, Command};
use infraview::config::{watcher::ConfigWatcher, Settings};
use infraview::{create_app, AppState};
use infraview_core::branch::Branch;
use infraview_core::dropdown::DropdownOptions;
use infraview_core::form::{derive_form_structure, dropdown_peers, FormContext};
use infraview_core::layout::{column_names, list_columns};
use infraview_core::query::{
    branch_create_mutation, branch_delete_mutation, dropdown_options_query, object_details_query,
    object_list_query, Pagination,
};
use infraview_core::row::{ObjectPage, ObjectRow};
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    match cli.command() {
        Command::Serve => serve(cli, settings).await,
        Command::Schema => print_schema(&settings).await,
        Command::List { kind, page } => print_list(&settings, &kind, page).await,
        Command::Form { kind, id } => print_form(&settings, &kind, id.as_deref()).await,
        Command::Branch(command) => run_branch_command(&settings, command).await,
        Command::Config => {
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

fn active_branch(settings: &Settings) -> Option<&str> {
    Some(settings.ui.default_branch.as_str())
}

async fn serve(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let host = settings.server.host.clone();
    let port = settings.server.port;
    info!("Starting Infraview on {}:{}", host, port);

    let state = AppState::new(&settings)?;
    let client = state.client.current().await;
    if let Err(e) = state.store.reload(&client, active_branch(&settings)).await {
        warn!("Schema not loaded at startup, readiness will report not ready: {}", e);
    }

    // Reload settings and schema whenever the config file changes
    let (_watcher, mut changes) = ConfigWatcher::new(cli.config.clone())?;
    let watched = state.clone();
    tokio::spawn(async move {
        while ConfigWatcher::next_change(&mut changes).await.is_some() {
            info!("Configuration change detected, reloading...");
            match Settings::new_with_cli(&cli) {
                Ok(settings) => {
                    if let Err(e) = watched.apply_upstream(&settings, active_branch(&settings)).await {
                        error!("Failed to apply upstream settings: {}", e);
                    }
                }
                Err(e) => error!("Failed to reload configuration: {}", e),
            }
        }
    });

    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn print_schema(settings: &Settings) -> anyhow::Result<()> {
    let client = GraphqlClient::new(&settings.upstream)?;
    let snapshot = client.fetch_schema(active_branch(settings)).await?;
    for (namespace, nodes) in snapshot.menu() {
        println!("{}", if namespace.is_empty() { "(none)" } else { namespace.as_str() });
        for node in nodes {
            println!(
                "  {:<32} {} attributes, {} relationships",
                node.kind,
                node.attributes.len(),
                node.relationships.len()
            );
        }
    }
    for generic in snapshot.generics() {
        println!("generic {} used by {}", generic.kind, generic.used_by.join(", "));
    }
    Ok(())
}

async fn print_list(settings: &Settings, kind: &str, page: usize) -> anyhow::Result<()> {
    let client = GraphqlClient::new(&settings.upstream)?;
    let branch = active_branch(settings);
    let snapshot = client.fetch_schema(branch).await?;
    let schema = snapshot.require_node(kind)?;

    let columns = column_names(&list_columns(schema));
    let pagination = Pagination::page(page, settings.ui.page_size);
    let data = client
        .execute_document(&object_list_query(schema, &columns, pagination, &[]), None, branch)
        .await?;
    let result = ObjectPage::from_response(schema, &data)?;

    println!("id\t{}", columns.join("\t"));
    for row in &result.rows {
        let cells: Vec<String> = columns.iter().map(|c| row.cell_text(c)).collect();
        println!("{}\t{}", row.id, cells.join("\t"));
    }
    println!(
        "{} of {} {} (page {})",
        result.rows.len(),
        result.count,
        kind,
        page
    );
    Ok(())
}

async fn print_form(settings: &Settings, kind: &str, id: Option<&str>) -> anyhow::Result<()> {
    let client = GraphqlClient::new(&settings.upstream)?;
    let branch = active_branch(settings);
    let snapshot = client.fetch_schema(branch).await?;
    let schema = snapshot.require_node(kind)?;

    let peers = dropdown_peers(schema, &snapshot);
    let options = if peers.is_empty() {
        DropdownOptions::new()
    } else {
        let data = client
            .execute_document(&dropdown_options_query(&peers), None, branch)
            .await?;
        DropdownOptions::from_response(&peers, &data)?
    };

    let row = match id {
        Some(id) => {
            let data = client
                .execute_document(&object_details_query(schema, id), None, branch)
                .await?;
            let node = data
                .get(kind)
                .and_then(|envelope| envelope.get("edges"))
                .and_then(|edges| edges.get(0))
                .and_then(|edge| edge.get("node"))
                .ok_or_else(|| anyhow::anyhow!("{} {} not found", kind, id))?;
            Some(ObjectRow::from_node(schema, node)?)
        }
        None => None,
    };

    let ctx = FormContext::new(&snapshot, &options);
    let fields = derive_form_structure(Some(schema), &ctx, row.as_ref());
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

async fn run_branch_command(settings: &Settings, command: BranchCommand) -> anyhow::Result<()> {
    let client = GraphqlClient::new(&settings.upstream)?;
    match command {
        BranchCommand::Create {
            name,
            description,
            sync_with_git,
        } => {
            let variables = Branch::create_variables(&name, description.as_deref(), sync_with_git);
            client
                .execute_document(&branch_create_mutation(), Some(variables), None)
                .await?;
            info!(branch = %name, "Branch created");
        }
        BranchCommand::Delete { name } => {
            let variables = serde_json::json!({ "name": name });
            client
                .execute_document(&branch_delete_mutation(), Some(variables), None)
                .await?;
            info!(branch = %name, "Branch deleted");
        }
    }
    Ok(())
}
