use crate::cli::{Cli, Commands, ProviderArg};
use cloudidp::engine::{
    self, DispatchOutcome, Provider, ProviderRegistry, SessionContext, SessionDefaults, ViewBlock,
    ViewDescriptor,
};
use cloudidp::{config, logging, ui};
use std::process;
use std::sync::Arc;

pub fn run(cli: Cli) {
    let mut config = config::Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}", e);
        eprintln!("Falling back to built-in defaults.");
        config::Config::default()
    });

    if cli.log {
        config.logging.enabled = true;
    }
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
    if let Some(raw) = &config.startup.rejected_provider {
        tracing::error!(provider = %raw, fallback = %config.startup.provider, "unknown provider in config");
        eprintln!(
            "Warning: unknown provider '{}' in config, using {}",
            raw, config.startup.provider
        );
    }

    // Handle subcommands first
    if let Some(command) = cli.command {
        match command {
            Commands::Modules { provider } => handle_modules(&config, provider),
            Commands::Render {
                module,
                provider,
                json,
            } => handle_render(&config, &module, provider, json),
            Commands::Regions { provider } => handle_regions(&config, provider),
            Commands::Context { provider } => handle_context(&config, provider),
            Commands::InitConfig => handle_init_config(),
        }
        return;
    }

    if let Some(module) = cli.module {
        config.startup.module = module;
    }
    let startup_provider = cli.provider.map(Provider::from);

    // Launch TUI (default behavior)
    if let Err(e) = ui::run_ui_with_options(startup_provider, &config) {
        eprintln!("Error running UI: {}", e);
        process::exit(1);
    }
}

fn handle_modules(config: &config::Config, provider: Option<ProviderArg>) {
    let nav = engine::bootstrap(config, provider.map(Provider::from));
    let current = nav.current_provider();

    println!("Modules for {}:", current);
    for item in nav.nav_items() {
        let status = if item.available {
            "available"
        } else {
            "coming soon"
        };
        let providers = nav
            .modules()
            .providers_for(&item.key)
            .iter()
            .map(Provider::name)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} {:<22} {:<20} [{}] ({})",
            item.icon,
            item.key,
            item.label,
            status,
            if providers.is_empty() { "-".to_string() } else { providers }
        );
    }
}

fn handle_render(
    config: &config::Config,
    module: &str,
    provider: Option<ProviderArg>,
    json: bool,
) {
    let mut nav = engine::bootstrap(config, provider.map(Provider::from));
    nav.activate(module);
    let screen = nav.render();

    if json {
        match serde_json::to_string_pretty(&screen.outcome) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: failed to serialize outcome: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_outcome(&screen.outcome);
    }

    if screen.outcome.is_failed() {
        process::exit(1);
    }
}

fn print_outcome(outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Rendered { view, .. } => print_view(view),
        DispatchOutcome::Unavailable {
            module_key,
            provider,
        } => {
            println!("{} is coming soon for {}.", module_key, provider);
        }
        DispatchOutcome::Failed {
            module_key,
            provider,
            error,
        } => {
            eprintln!("Error loading {} for {}: {}", module_key, provider, error);
        }
    }
}

fn print_view(view: &ViewDescriptor) {
    println!("{}", view.title);
    if let Some(ref subtitle) = view.subtitle {
        println!("{}", subtitle);
    }
    for block in &view.blocks {
        println!();
        match block {
            ViewBlock::Text(text) => println!("{}", text),
            ViewBlock::Metrics(metrics) => {
                for (name, value) in metrics {
                    println!("  {:<24} {}", name, value);
                }
            }
            ViewBlock::Table { headers, rows } => {
                println!("  {}", headers.join(" | "));
                for row in rows {
                    println!("  {}", row.join(" | "));
                }
            }
        }
    }
}

fn handle_regions(config: &config::Config, provider: ProviderArg) {
    let registry = ProviderRegistry::from_config(&config.catalog);
    let provider = Provider::from(provider);

    match registry.regions_for(provider) {
        Ok(regions) => {
            println!("{} {}s:", provider, provider.region_noun().to_lowercase());
            for region in regions {
                println!("  {}", region);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_context(config: &config::Config, provider: Option<ProviderArg>) {
    let registry = Arc::new(ProviderRegistry::from_config(&config.catalog));
    let defaults = SessionDefaults {
        provider: provider.map(Provider::from).unwrap_or(config.startup.provider),
        module: config.startup.module.clone(),
    };
    let session = SessionContext::with_defaults(Arc::clone(&registry), defaults);

    println!("Session defaults:");
    for (key, value) in session.entries() {
        println!("  {:<24} {}", key, value);
    }

    let current = session.current_provider();
    println!();
    println!("{} context:", current);
    for (name, value) in session.cloud_context().entries {
        println!("  {:<24} {}", name, value);
    }

    match registry.active_tenant_count(current) {
        Ok(count) => println!("  {:<24} {}", "active tenants", count),
        Err(e) => eprintln!("Warning: {}", e),
    }
}

fn handle_init_config() {
    match config::Config::config_path() {
        Ok(path) if path.exists() => match config::Config::load_from(&path) {
            Ok(cfg) => {
                println!("Config loaded successfully from {}", path.display());
                println!("{:#?}", cfg);
            }
            Err(e) => {
                eprintln!("Config invalid: {:#}", e);
                process::exit(1);
            }
        },
        Ok(path) => {
            println!("Config missing, creating default...");
            if let Err(err) = config::Config::default().save_to(&path) {
                eprintln!("Failed to save default config: {:#}", err);
                process::exit(1);
            }
            println!("Default config saved to {}", path.display());
        }
        Err(e) => {
            eprintln!("Config path unknown: {:#}", e);
            process::exit(1);
        }
    }
}
