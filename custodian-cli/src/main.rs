use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use custodian_core::provider::{Provider, ResourceType};
use custodian_core::resource::{ResourceId, Value};
use custodian_core::schema::{AttributeSchema, ResourceSchema};
use custodian_provider_ibm::{IbmProvider, ProviderConfig};
use custodian_state::{
    BackendConfig, LockInfo, ResourceState, StateBackend, StateFile, create_backend,
};

mod apply;
mod config;
mod references;

use apply::{Action, apply_resource, carry_sensitive};
use config::Configuration;
use references::Bindings;

#[derive(Parser)]
#[command(name = "custodian")]
#[command(about = "Manage IBM Backup Recovery objects as code", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG is honored otherwise)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// State file path, overriding the backend block
    #[arg(long, global = true, env = "CUSTODIAN_STATE")]
    state: Option<PathBuf>,

    /// Backup Recovery service URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// IBM Cloud region of the service instance
    #[arg(long, global = true)]
    region: Option<String>,

    /// Backup Recovery service instance ID
    #[arg(long, global = true)]
    instance_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file against the resource schemas
    Validate {
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
    /// Create, update or delete resources to match the configuration
    Apply {
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
    /// Re-read every resource recorded in state
    Refresh {
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
    /// Delete every resource recorded in state
    Destroy {
        #[arg(default_value = "main.json")]
        file: PathBuf,

        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
    /// Bring an existing remote object under management
    Import {
        /// Resource type (e.g., protection_policy)
        resource_type: String,
        /// Name to record the resource under
        name: String,
        /// Identifier in the form <tenant>::<id>
        identifier: String,

        #[arg(long, short, default_value = "main.json")]
        file: PathBuf,
    },
    /// Print resource schemas
    Schema {
        /// Only this resource or data-source type
        resource_type: Option<String>,
    },
    /// Print the recorded state
    Show {
        #[arg(default_value = "main.json")]
        file: PathBuf,
    },
}

/// Settings given on the command line
struct Settings {
    state: Option<PathBuf>,
    provider: ProviderConfig,
}

impl Settings {
    /// Provider block, then environment, then flags
    fn provider(&self, config: &Configuration) -> Result<IbmProvider, String> {
        let env = ProviderConfig::from_env().map_err(|e| e.to_string())?;
        let merged = config
            .provider
            .clone()
            .merge(env)
            .merge(self.provider.clone());
        Ok(IbmProvider::new(&merged))
    }

    async fn backend(
        &self,
        config: Option<&Configuration>,
    ) -> Result<Box<dyn StateBackend>, String> {
        let mut backend = config
            .map(|c| c.backend.clone())
            .unwrap_or_else(BackendConfig::local);
        if let Some(path) = &self.state {
            backend.attributes.insert(
                "path".to_string(),
                Value::String(path.display().to_string()),
            );
        }
        create_backend(&backend).await.map_err(|e| e.to_string())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings {
        state: cli.state,
        provider: ProviderConfig {
            endpoint: cli.endpoint,
            region: cli.region,
            instance_id: cli.instance_id,
            ..Default::default()
        },
    };

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Apply { file } => run_apply(&settings, &file).await,
        Commands::Refresh { file } => run_refresh(&settings, &file).await,
        Commands::Destroy { file, auto_approve } => {
            run_destroy(&settings, &file, auto_approve).await
        }
        Commands::Import {
            resource_type,
            name,
            identifier,
            file,
        } => run_import(&settings, &file, &resource_type, &name, &identifier).await,
        Commands::Schema { resource_type } => run_schema(resource_type.as_deref()),
        Commands::Show { file } => run_show(&settings, &file).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn resource_types() -> HashMap<&'static str, Box<dyn ResourceType>> {
    custodian_provider_ibm::resources::resource_types()
        .into_iter()
        .map(|rt| (rt.name(), rt))
        .collect()
}

fn validate_blocks(config: &Configuration) -> Result<(), String> {
    let types = resource_types();
    let mut errors = Vec::new();

    for block in config.blocks() {
        let label = block.id.binding();
        let Some(rt) = types.get(block.id.resource_type.as_str()) else {
            errors.push(format!("{}: unknown type '{}'", label, block.id.resource_type));
            continue;
        };
        if rt.is_data_source() != block.read_only {
            let section = if rt.is_data_source() { "data" } else { "resources" };
            errors.push(format!(
                "{}: '{}' belongs under \"{}\"",
                label, block.id.resource_type, section
            ));
            continue;
        }
        if let Err(errs) = rt.schema().validate(&block.attributes) {
            errors.extend(errs.into_iter().map(|e| format!("{}: {}", label, e)));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("\n"))
    }
}

async fn persist(backend: &dyn StateBackend, state: &mut StateFile) -> Result<(), String> {
    state.increment_serial();
    backend
        .write_state(state)
        .await
        .map_err(|e| format!("Failed to write state: {}", e))
}

async fn acquire_lock(backend: &dyn StateBackend, operation: &str) -> Result<LockInfo, String> {
    backend
        .acquire_lock(operation)
        .await
        .map_err(|e| e.to_string())
}

async fn release_lock(backend: &dyn StateBackend, lock: &LockInfo) -> Result<(), String> {
    backend
        .release_lock(lock)
        .await
        .map_err(|e| format!("Failed to release state lock: {}", e))
}

async fn read_state(backend: &dyn StateBackend) -> Result<StateFile, String> {
    Ok(backend
        .read_state()
        .await
        .map_err(|e| e.to_string())?
        .unwrap_or_default())
}

fn state_bindings(state: &StateFile) -> Bindings {
    state
        .resources
        .iter()
        .map(|r| (r.id().binding(), r.to_state().attributes))
        .collect()
}

// =============================================================================
// validate
// =============================================================================

fn run_validate(file: &Path) -> Result<(), String> {
    let config = config::load(file)?;
    validate_blocks(&config)?;
    println!(
        "{} Configuration is valid ({} resources, {} data sources).",
        "✓".green(),
        config.resources.len(),
        config.data.len()
    );
    Ok(())
}

// =============================================================================
// apply
// =============================================================================

async fn run_apply(settings: &Settings, file: &Path) -> Result<(), String> {
    let config = config::load(file)?;
    validate_blocks(&config)?;
    let provider = settings.provider(&config)?;
    let backend = settings.backend(Some(&config)).await?;

    let lock = acquire_lock(backend.as_ref(), "apply").await?;
    let result = apply_configuration(&provider, backend.as_ref(), &config).await;
    let released = release_lock(backend.as_ref(), &lock).await;
    result.and(released)
}

async fn apply_configuration(
    provider: &IbmProvider,
    backend: &dyn StateBackend,
    config: &Configuration,
) -> Result<(), String> {
    let types = resource_types();
    let mut state = read_state(backend).await?;
    let mut bindings = state_bindings(&state);

    println!("{}", "Applying configuration...".cyan().bold());
    println!();

    let mut counts: HashMap<Action, usize> = HashMap::new();
    let mut deleted = 0;
    let mut failed = 0;

    // Data sources and resources in one dependency order
    let blocks: Vec<_> = config.blocks().cloned().collect();
    for resource in references::sort_by_dependencies(&blocks) {
        let Some(rt) = types.get(resource.id.resource_type.as_str()) else {
            continue;
        };

        if resource.read_only {
            let result = match references::resolve(&resource, &bindings) {
                Ok(resolved) => provider
                    .read_data_source(&resolved)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e),
            };
            match result {
                Ok(read) => {
                    println!("  {} {} {}", "✓".green(), resource.id, "(read)".dimmed());
                    bindings.insert(resource.id.binding(), read.attributes);
                }
                Err(e) => {
                    println!("  {} {} - {}", "✗".red(), resource.id, e);
                    failed += 1;
                }
            }
            continue;
        }

        let schema = rt.schema();
        let previous = state
            .find_resource(&resource.id.resource_type, &resource.id.name)
            .cloned();

        let outcome = match references::resolve(&resource, &bindings) {
            Ok(resolved) => apply_resource(provider, &schema, &resolved, previous.as_ref()).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok((action, new_state)) => {
                let symbol = match action {
                    Action::Created => "+".green(),
                    Action::Updated => "~".yellow(),
                    Action::Replaced => "±".magenta(),
                    Action::Unchanged => "=".dimmed(),
                };
                println!("  {} {} ({})", symbol, resource.id, action);
                *counts.entry(action).or_default() += 1;

                bindings.insert(resource.id.binding(), new_state.attributes.clone());
                let protected = previous.as_ref().is_some_and(|p| p.protected);
                state.upsert_resource(
                    ResourceState::from_state(&new_state, provider.name()).with_protected(protected),
                );
                persist(backend, &mut state).await?;
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), resource.id, e);
                failed += 1;
            }
        }
    }

    // Resources recorded in state but no longer configured
    let configured: HashSet<String> = config.resources.iter().map(|r| r.id.binding()).collect();
    let orphans: Vec<ResourceState> = state
        .resources
        .iter()
        .rev()
        .filter(|r| !configured.contains(&r.id().binding()))
        .cloned()
        .collect();

    for orphan in orphans {
        let id = orphan.id();
        if orphan.protected {
            println!("  {} {} (protected, kept)", "!".yellow(), id);
            continue;
        }
        match delete_recorded(provider, &orphan).await {
            Ok(()) => {
                println!("  {} {} (deleted)", "-".red(), id);
                deleted += 1;
                state.remove_resource(&orphan.resource_type, &orphan.name);
                persist(backend, &mut state).await?;
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), id, e);
                failed += 1;
            }
        }
    }

    let count = |action: Action| counts.get(&action).copied().unwrap_or(0);
    let summary = format!(
        "{} created, {} updated, {} replaced, {} deleted, {} unchanged",
        count(Action::Created),
        count(Action::Updated),
        count(Action::Replaced),
        deleted,
        count(Action::Unchanged)
    );

    println!();
    if failed == 0 {
        println!("{}", format!("Apply complete! {}.", summary).green().bold());
        Ok(())
    } else {
        Err(format!("Apply failed: {} step(s) failed ({}).", failed, summary))
    }
}

async fn delete_recorded(provider: &dyn Provider, recorded: &ResourceState) -> Result<(), String> {
    match recorded.identifier.as_deref() {
        Some(identifier) => provider
            .delete(&recorded.id(), identifier)
            .await
            .map_err(|e| e.to_string()),
        None => {
            log::warn!("{} has no identifier, forgetting it", recorded.id());
            Ok(())
        }
    }
}

// =============================================================================
// refresh
// =============================================================================

async fn run_refresh(settings: &Settings, file: &Path) -> Result<(), String> {
    let config = config::load(file)?;
    let provider = settings.provider(&config)?;
    let backend = settings.backend(Some(&config)).await?;

    let lock = acquire_lock(backend.as_ref(), "refresh").await?;
    let result = refresh_state(&provider, backend.as_ref()).await;
    let released = release_lock(backend.as_ref(), &lock).await;
    result.and(released)
}

async fn refresh_state(provider: &IbmProvider, backend: &dyn StateBackend) -> Result<(), String> {
    let types = resource_types();
    let mut state = read_state(backend).await?;

    for recorded in state.resources.clone() {
        let id = recorded.id();
        let mut current = provider
            .read(&id, recorded.identifier.as_deref())
            .await
            .map_err(|e| e.to_string())?;

        if current.exists {
            if let Some(rt) = types.get(recorded.resource_type.as_str()) {
                carry_sensitive(&rt.schema(), &mut current, &recorded.to_state().attributes);
            }
            state.upsert_resource(
                ResourceState::from_state(&current, provider.name())
                    .with_protected(recorded.protected),
            );
            println!("  {} {} (refreshed)", "✓".green(), id);
        } else {
            state.remove_resource(&recorded.resource_type, &recorded.name);
            println!("  {} {} (gone, removed from state)", "-".yellow(), id);
        }
    }

    persist(backend, &mut state).await?;
    println!();
    println!("{}", "Refresh complete!".green().bold());
    Ok(())
}

// =============================================================================
// destroy
// =============================================================================

async fn run_destroy(settings: &Settings, file: &Path, auto_approve: bool) -> Result<(), String> {
    let config = config::load(file)?;
    let provider = settings.provider(&config)?;
    let backend = settings.backend(Some(&config)).await?;

    let lock = acquire_lock(backend.as_ref(), "destroy").await?;
    let result = destroy_state(&provider, backend.as_ref(), auto_approve).await;
    let released = release_lock(backend.as_ref(), &lock).await;
    result.and(released)
}

async fn destroy_state(
    provider: &IbmProvider,
    backend: &dyn StateBackend,
    auto_approve: bool,
) -> Result<(), String> {
    let mut state = read_state(backend).await?;

    // Reverse creation order: dependents first
    let targets: Vec<ResourceState> = state
        .resources
        .iter()
        .rev()
        .filter(|r| !r.protected)
        .cloned()
        .collect();

    if targets.is_empty() {
        println!("{}", "No resources to destroy.".green());
        return Ok(());
    }

    println!("{}", "Destroy Plan:".red().bold());
    println!();
    for target in &targets {
        println!("  {} {}", "-".red().bold(), target.id());
    }
    println!();
    println!("Plan: {} to destroy.", targets.len().to_string().red());
    println!();

    if !auto_approve && !confirm()? {
        println!();
        println!("{}", "Destroy cancelled.".yellow());
        return Ok(());
    }

    println!("{}", "Destroying resources...".red().bold());
    println!();

    let mut success_count = 0;
    let mut failure_count = 0;

    for target in targets {
        match delete_recorded(provider, &target).await {
            Ok(()) => {
                println!("  {} {}", "✓".green(), target.id());
                success_count += 1;
                state.remove_resource(&target.resource_type, &target.name);
                persist(backend, &mut state).await?;
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), target.id(), e);
                failure_count += 1;
            }
        }
    }

    println!();
    if failure_count == 0 {
        println!(
            "{}",
            format!("Destroy complete! {} resources destroyed.", success_count)
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Destroy failed. {} succeeded, {} failed.",
            success_count, failure_count
        ))
    }
}

fn confirm() -> Result<bool, String> {
    println!(
        "{}",
        "Do you really want to destroy all resources?"
            .yellow()
            .bold()
    );
    println!(
        "  {}",
        "This action cannot be undone. Type 'yes' to confirm.".yellow()
    );
    print!("\n  Enter a value: ");
    std::io::Write::flush(&mut std::io::stdout()).map_err(|e| e.to_string())?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| e.to_string())?;
    Ok(input.trim() == "yes")
}

// =============================================================================
// import
// =============================================================================

async fn run_import(
    settings: &Settings,
    file: &Path,
    resource_type: &str,
    name: &str,
    identifier: &str,
) -> Result<(), String> {
    let types = resource_types();
    match types.get(resource_type) {
        None => return Err(format!("Unknown resource type '{}'", resource_type)),
        Some(rt) if rt.is_data_source() => {
            return Err(format!("'{}' is a data source and cannot be imported", resource_type));
        }
        Some(_) => {}
    }

    let config = config::load(file)?;
    let provider = settings.provider(&config)?;
    let backend = settings.backend(Some(&config)).await?;

    let lock = acquire_lock(backend.as_ref(), "import").await?;
    let result = import_resource(&provider, backend.as_ref(), resource_type, name, identifier).await;
    let released = release_lock(backend.as_ref(), &lock).await;
    result.and(released)
}

async fn import_resource(
    provider: &IbmProvider,
    backend: &dyn StateBackend,
    resource_type: &str,
    name: &str,
    identifier: &str,
) -> Result<(), String> {
    let mut state = read_state(backend).await?;
    if state.find_resource(resource_type, name).is_some() {
        return Err(format!("{}.{} is already managed", resource_type, name));
    }

    let id = ResourceId::new(resource_type, name);
    let current = provider
        .read(&id, Some(identifier))
        .await
        .map_err(|e| e.to_string())?;
    if !current.exists {
        return Err(format!("No remote object found for '{}'", identifier));
    }

    state.upsert_resource(ResourceState::from_state(&current, provider.name()));
    persist(backend, &mut state).await?;
    println!("{} Imported {} ({})", "✓".green(), id, identifier);
    Ok(())
}

// =============================================================================
// schema / show
// =============================================================================

fn run_schema(resource_type: Option<&str>) -> Result<(), String> {
    let mut types: Vec<Box<dyn ResourceType>> = custodian_provider_ibm::resources::resource_types()
        .into_iter()
        .filter(|rt| resource_type.is_none_or(|t| rt.name() == t))
        .collect();
    if types.is_empty() {
        return Err(format!(
            "Unknown resource type '{}'",
            resource_type.unwrap_or_default()
        ));
    }
    types.sort_by_key(|rt| (rt.is_data_source(), rt.name()));

    for rt in types {
        print_schema(&rt.schema(), rt.is_data_source());
        println!();
    }
    Ok(())
}

fn print_schema(schema: &ResourceSchema, data_source: bool) {
    let kind = if data_source { "data" } else { "resource" };
    println!("{} {}", kind.cyan(), schema.resource_type.bold());
    if let Some(description) = &schema.description {
        println!("  {}", description.dimmed());
    }
    print_fields(&schema.attributes, 1);
}

fn print_fields(fields: &HashMap<String, AttributeSchema>, depth: usize) {
    let mut names: Vec<&String> = fields.keys().collect();
    names.sort();

    for name in names {
        let attr = &fields[name];
        println!(
            "{}{}: {} {}",
            "  ".repeat(depth),
            name,
            attr.attr_type,
            attribute_flags(attr).dimmed()
        );
        if let Some(nested) = attr.attr_type.struct_fields() {
            print_fields(nested, depth + 1);
        }
    }
}

fn attribute_flags(attr: &AttributeSchema) -> String {
    let mut flags = Vec::new();
    if attr.required {
        flags.push("required".to_string());
    } else if attr.optional {
        flags.push("optional".to_string());
    }
    if attr.computed {
        flags.push("computed".to_string());
    }
    if attr.force_new {
        flags.push("force-new".to_string());
    }
    if attr.sensitive {
        flags.push("sensitive".to_string());
    }
    if let Some(max) = attr.max_items {
        flags.push(format!("max {}", max));
    }
    if !attr.conflicts_with.is_empty() {
        flags.push(format!("conflicts with {}", attr.conflicts_with.join(", ")));
    }
    format!("({})", flags.join(", "))
}

async fn run_show(settings: &Settings, file: &Path) -> Result<(), String> {
    let config = if file.exists() {
        Some(config::load(file)?)
    } else {
        None
    };
    let backend = settings.backend(config.as_ref()).await?;
    let Some(state) = backend.read_state().await.map_err(|e| e.to_string())? else {
        println!("{}", "No state recorded.".yellow());
        return Ok(());
    };

    let types = resource_types();
    println!(
        "{} serial {}, lineage {}",
        "State".bold(),
        state.serial,
        state.lineage.dimmed()
    );

    for resource in &state.resources {
        println!();
        let protected = if resource.protected { " (protected)" } else { "" };
        println!("{}{}", resource.id().to_string().bold(), protected);
        if let Some(identifier) = &resource.identifier {
            println!("  {} = {}", "identifier".dimmed(), identifier);
        }

        let sensitive: HashSet<String> = types
            .get(resource.resource_type.as_str())
            .map(|rt| {
                rt.schema()
                    .attributes
                    .into_values()
                    .filter(|a| a.sensitive)
                    .map(|a| a.name)
                    .collect()
            })
            .unwrap_or_default();

        let mut names: Vec<&String> = resource.attributes.keys().collect();
        names.sort();
        for name in names {
            let rendered = if sensitive.contains(name) {
                "(sensitive)".dimmed().to_string()
            } else {
                resource.attributes[name].to_string()
            };
            println!("  {} = {}", name, rendered);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_each_block() {
        let config = config::parse(
            r#"{
                "resources": [
                    { "type": "protection_policy", "name": "gold", "attributes": { "x_ibm_tenant_id": "t/" } },
                    { "type": "protection_policies", "name": "misplaced", "attributes": { "x_ibm_tenant_id": "t/" } },
                    { "type": "backup_job", "name": "nightly" }
                ]
            }"#,
        )
        .unwrap();

        let err = validate_blocks(&config).unwrap_err();
        assert!(err.contains("protection_policy.gold: Required attribute 'name' is missing"));
        assert!(err.contains("protection_policies.misplaced: 'protection_policies' belongs under \"data\""));
        assert!(err.contains("backup_job.nightly: unknown type 'backup_job'"));
    }

    #[test]
    fn validate_accepts_references() {
        let config = config::parse(
            r#"{
                "resources": [
                    { "type": "data_source_connection", "name": "edge",
                      "attributes": { "x_ibm_tenant_id": "t/", "connection_name": "edge" } },
                    { "type": "source_registration", "name": "host",
                      "attributes": {
                          "x_ibm_tenant_id": "t/",
                          "environment": "kPhysical",
                          "data_source_connection_id": "${data_source_connection.edge.connection_id}"
                      } }
                ],
                "data": [
                    { "type": "data_source_connectors", "name": "all",
                      "attributes": { "x_ibm_tenant_id": "t/", "connection_id": "${data_source_connection.edge.connection_id}" } }
                ]
            }"#,
        )
        .unwrap();
        validate_blocks(&config).unwrap();
    }

    #[test]
    fn demo_configuration_is_valid() {
        let config = config::parse(include_str!("../../demos/physical-host.json")).unwrap();
        validate_blocks(&config).unwrap();

        let blocks: Vec<_> = config.blocks().cloned().collect();
        let order: Vec<String> = references::sort_by_dependencies(&blocks)
            .iter()
            .map(|r| r.id.binding())
            .collect();
        let connection = order.iter().position(|b| b == "data_source_connection.edge");
        let connectors = order.iter().position(|b| b == "data_source_connectors.edge");
        assert!(connection < connectors);
    }

    #[test]
    fn attribute_flags_list_markers() {
        let schema = custodian_provider_ibm::schemas::connector::schema();
        let connector_id = &schema.attributes["connector_id"];
        assert_eq!(attribute_flags(connector_id), "(required, force-new)");

        let registration = custodian_provider_ibm::schemas::source_registration::schema();
        let key = &registration.attributes["encryption_key"];
        assert_eq!(attribute_flags(key), "(optional, sensitive)");
    }

    #[test]
    fn state_bindings_expose_recorded_attributes() {
        let mut state = StateFile::new();
        state.upsert_resource(
            ResourceState::new("data_source_connection", "edge", "ibm")
                .with_attribute("connection_id", serde_json::json!("c-7")),
        );
        let bindings = state_bindings(&state);
        assert_eq!(
            bindings["data_source_connection.edge"].get("connection_id"),
            Some(&Value::String("c-7".to_string()))
        );
    }
}
