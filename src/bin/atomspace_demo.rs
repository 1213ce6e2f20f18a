//! AtomSpace-Boundary demo binary
//!
//! Builds a sample multi-organization infrastructure, runs a few
//! cross-organization queries and prints the full hierarchy as JSON.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `ATOMSPACE_ROOT_NAME`: name of the root atom (default: global)
//! - `ATOMSPACE_DUPLICATE_NAMES`: `reject` or `replace` (default: reject)
//! - `RUST_LOG`: Log level filter (default: atomspace_demo=info,atomspace_boundary=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Logs go to stderr; query results and the hierarchy JSON go to stdout.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=atomspace_boundary=debug cargo run --bin atomspace_demo
//! ```

use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atomspace_boundary::{
    Atom, AtomRegistry, RegistryConfig, RegistryError, HIERARCHY_SCHEMA_VERSION,
};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atomspace_demo=info,atomspace_boundary=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Populate organizations, projects and resources at every tier.
fn create_sample_infrastructure(registry: &mut AtomRegistry) -> Result<(), RegistryError> {
    for org in ["acme-corp", "tech-innovations", "quick-startup"] {
        registry.create_organization(org)?;
    }

    let dns = registry.create_global_resource("enterprise-dns", "service")?;
    dns.set_attribute("environment", "production");
    registry.create_org_resource("acme-corp", "corp-vpn", "network")?;

    let projects = [
        ("acme-corp", "web-services"),
        ("acme-corp", "data-platform"),
        ("tech-innovations", "ai-research"),
        ("tech-innovations", "ml-ops"),
        ("quick-startup", "mvp-app"),
    ];
    for (org, project) in projects {
        registry.create_project(org, project)?;
    }

    let resources = [
        ("acme-corp", "web-services", "web-server-01", "host"),
        ("acme-corp", "web-services", "web-server-02", "host"),
        ("acme-corp", "web-services", "load-balancer", "service"),
        ("acme-corp", "web-services", "redis-cache", "service"),
        ("acme-corp", "data-platform", "postgres-primary", "database"),
        ("acme-corp", "data-platform", "postgres-replica", "database"),
        ("acme-corp", "data-platform", "etl-pipeline", "service"),
        ("tech-innovations", "ai-research", "gpu-node-01", "compute"),
        ("tech-innovations", "ai-research", "gpu-node-02", "compute"),
        ("tech-innovations", "ai-research", "data-lake", "storage"),
        ("tech-innovations", "ml-ops", "model-api", "service"),
        ("tech-innovations", "ml-ops", "ml-monitor", "service"),
        ("quick-startup", "mvp-app", "app-server", "host"),
        ("quick-startup", "mvp-app", "sqlite-db", "database"),
    ];
    for (org, project, name, resource_type) in resources {
        registry.create_resource(org, project, name, resource_type)?;
    }

    let attributes: [(&str, &[(&str, Value)]); 4] = [
        (
            "acme-corp/web-services/web-server-01",
            &[
                ("ip_address", Value::from("10.0.1.10")),
                ("cpu_cores", Value::from(4)),
                ("memory_gb", Value::from(16)),
                ("status", Value::from("running")),
                ("environment", Value::from("production")),
            ],
        ),
        (
            "acme-corp/data-platform/postgres-primary",
            &[
                ("version", Value::from("postgresql-14")),
                ("storage_gb", Value::from(1000)),
                ("status", Value::from("active")),
                ("environment", Value::from("production")),
            ],
        ),
        (
            "tech-innovations/ai-research/gpu-node-01",
            &[
                ("gpu_type", Value::from("NVIDIA A100")),
                ("cpu_cores", Value::from(64)),
                ("memory_gb", Value::from(512)),
                ("status", Value::from("training")),
                ("environment", Value::from("research")),
            ],
        ),
        (
            "quick-startup/mvp-app/app-server",
            &[
                ("ip_address", Value::from("192.168.1.100")),
                ("cpu_cores", Value::from(2)),
                ("memory_gb", Value::from(8)),
                ("status", Value::from("running")),
                ("environment", Value::from("development")),
            ],
        ),
    ];
    let root = registry.root_name().to_string();
    for (relative, pairs) in attributes {
        let path = format!("{root}/{relative}");
        match registry.get_atom_by_path_mut(&path) {
            Some(atom) => {
                for (key, value) in pairs {
                    atom.set_attribute(*key, value.clone());
                }
            }
            None => warn!(path = %path, "sample resource missing, attributes skipped"),
        }
    }

    Ok(())
}

fn print_resources(title: &str, registry: &AtomRegistry, resources: &[&Atom]) {
    println!("{title}:");
    for res in resources {
        let path = registry.get_path(res.id()).unwrap_or_default();
        println!(
            "  └── {} ({})",
            path,
            res.resource_type().unwrap_or_default()
        );
    }
    println!();
}

fn run_queries(registry: &AtomRegistry) {
    println!("Organizations:");
    for org in registry.list_organizations() {
        println!(
            "  └── {} ({} projects, {} org resources)",
            org.name(),
            registry.list_projects(org.name()).len(),
            registry.list_org_resources(org.name()).len()
        );
    }
    println!();

    let databases = registry.find_resources(|r| r.resource_type() == Some("database"));
    print_resources("Database resources", registry, &databases);

    let production = registry.find_resources(|r| {
        r.get_attribute("environment").and_then(Value::as_str) == Some("production")
    });
    print_resources("Production resources", registry, &production);

    let high_memory = registry.find_resources(|r| {
        r.get_attribute("memory_gb")
            .and_then(Value::as_u64)
            .is_some_and(|gb| gb >= 16)
    });
    print_resources("High-memory resources (>= 16GB)", registry, &high_memory);

    let gpu_path = format!("{}/tech-innovations/ai-research/gpu-node-01", registry.root_name());
    if let Some(gpu) = registry.get_atom_by_path(&gpu_path) {
        let chain: Vec<String> = registry.ancestors(gpu.id()).map(Atom::to_string).collect();
        let chain: Vec<&str> = chain.iter().rev().map(String::as_str).collect();
        println!("Bottom-up traversal: {}", chain.join(" → "));
        println!();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = RegistryConfig::from_env()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        schema_version = HIERARCHY_SCHEMA_VERSION,
        root_name = %config.root_name,
        duplicate_names = %config.duplicate_names,
        "Starting AtomSpace-Boundary demo"
    );

    let mut registry = AtomRegistry::with_config(config)?;
    create_sample_infrastructure(&mut registry)?;

    let hierarchy = registry.get_hierarchy_info();
    info!(
        atoms = registry.id_index_len(),
        organizations = hierarchy.organization_count(),
        projects = hierarchy.project_count(),
        resources = hierarchy.resource_count(),
        fingerprint = %hierarchy.fingerprint(),
        "Sample infrastructure created"
    );

    run_queries(&registry);

    println!("{}", hierarchy.to_json_pretty()?);
    Ok(())
}
