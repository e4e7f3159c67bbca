use axum::{
    routing::{delete, get, post},
    Router,
};
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, Cell, ContentArrangement, Table};
use std::net::SocketAddr;
use std::process;
use terminal_size::{terminal_size, Width};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use vmquote::api::{self, deploy_quote, load_catalog, load_templates, submit_quote};
use vmquote::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use vmquote::handlers;
use vmquote::models::{
    AppState, Catalog, CustomerInfo, PriceLeg, PriceSource, Quote, ServiceFamily, StorageTier,
    TemplateGroup, VmSpec, VmTemplate,
};
use vmquote::services::{
    apply_selection, load_catalog_file, load_templates_file, price_breakdown, session_quote, SelectionDocument,
};
use vmquote::utils::format_money;

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    let client = reqwest::Client::builder()
        .user_agent(format!("vmquote/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            eprintln!("{}: {}", yansi::Paint::new("Failed to create HTTP client").red(), e);
            process::exit(1);
        });
    AppState::new(client, config::get_api_base_url(), config::get_api_token())
}

/// Catalog from `--file`, then `CATALOG_FILE`, then the backend.
async fn resolve_catalog(state: &AppState, file: Option<String>) -> Result<Catalog, String> {
    match file.map(Into::into).or_else(config::get_catalog_file) {
        Some(path) => load_catalog_file(path).await.map_err(|e| e.to_string()),
        None => load_catalog(&state.client, &state.api_base_url, &state.api_token)
            .await
            .map_err(|e| e.to_string()),
    }
}

async fn resolve_templates(state: &AppState, file: Option<String>) -> Result<Vec<VmTemplate>, String> {
    match file.map(Into::into).or_else(config::get_templates_file) {
        Some(path) => load_templates_file(path).await.map_err(|e| e.to_string()),
        None => load_templates(&state.client, &state.api_base_url, &state.api_token)
            .await
            .map_err(|e| e.to_string()),
    }
}

fn exit_with(context: &str, err: impl std::fmt::Display) -> ! {
    tracing::error!(%err, "{}", context);
    eprintln!("{}: {}", yansi::Paint::new(context).red(), err);
    process::exit(1);
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_catalog(catalog: &Catalog, family: Option<ServiceFamily>) {
    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Family", "Cost", "Profit %", "Price"]);
    let items = catalog
        .items()
        .iter()
        .filter(|i| family.is_none() || i.family == family);
    for item in items {
        table.add_row(vec![
            item.id.clone(),
            item.title.clone(),
            item.family.map(|f| f.to_string()).unwrap_or_default(),
            format_money(item.cost),
            format!("{}", item.profit),
            format_money(item.price),
        ]);
    }
    println!("\n{table}\n");
}

fn print_templates(templates: &[VmTemplate]) {
    let mut table = new_table();
    table.set_header(vec!["ID", "Group", "OS", "Tier", "vCPU", "Memory GB", "Storage GB", "GHz"]);
    for t in templates {
        table.add_row(vec![
            t.id.clone(),
            format!("{:?}", t.group),
            t.os_type.clone(),
            t.tier.to_string(),
            t.vcpus.to_string(),
            t.memory.to_string(),
            t.storage.to_string(),
            t.ghz.to_string(),
        ]);
    }
    println!("\n{table}\n");
}

fn leg_row(name: &str, leg: &PriceLeg) -> Vec<Cell> {
    let source = match &leg.source {
        PriceSource::Catalog { product_id } => format!("catalog ({})", product_id),
        PriceSource::Fallback => yansi::Paint::new("fallback").yellow().to_string(),
    };
    vec![Cell::new(name), Cell::new(format_money(leg.amount)), Cell::new(source)]
}

fn print_quote(quote: &Quote) {
    if quote.is_empty() {
        println!("(empty quote)");
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Description", "Price", "Units", "Unit"]);
    for item in &quote.items {
        table.add_row(vec![
            item.id.clone(),
            item.title.clone(),
            item.description.clone(),
            format_money(item.price),
            item.units.to_string(),
            item.unit.clone(),
        ]);
    }
    println!("\n{table}");
    println!(
        "{} {}\n",
        yansi::Paint::new("Total per month:").bold(),
        yansi::Paint::new(format_money(quote.total_cost)).green().bold()
    );
}

fn build_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/catalog", get(handlers::catalog::catalog_get))
        .route("/catalog/refresh", post(handlers::catalog::catalog_refresh))
        .route("/templates", get(handlers::catalog::templates_get))
        .route("/price", post(handlers::pricing::price_post))
        .route("/options", get(handlers::pricing::options_get))
        .route(
            "/wizard",
            get(handlers::wizard::wizard_get).put(handlers::wizard::wizard_put),
        )
        .route("/wizard/step", post(handlers::wizard::wizard_step_post))
        .route("/wizard/submit", post(handlers::wizard::wizard_submit))
        .route("/vms/:id", delete(handlers::wizard::vm_delete))
        .route("/addons", post(handlers::quote::addon_post))
        .route("/quote", get(handlers::quote::quote_get))
        .route("/quote/items/:id", delete(handlers::quote::quote_item_delete))
        .route("/quote/clear", post(handlers::quote::quote_clear_post))
        .route("/quote/submit", post(handlers::quote::quote_submit_post))
        .route("/quotes/:id/deploy", post(handlers::quote::quote_deploy_post));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn start_server(state: AppState, host: &str, port: u16) {
    match resolve_catalog(&state, None).await {
        Ok(catalog) => state.replace_catalog(catalog),
        Err(e) => tracing::warn!(%e, "Starting with an empty catalog; every price will use fallback rates"),
    }
    match resolve_templates(&state, None).await {
        Ok(templates) => state.replace_templates(templates),
        Err(e) => tracing::warn!(%e, "Starting without VM templates"),
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => exit_with("Invalid host/port format", e),
    };
    let app = build_app(state);
    tracing::info!(%addr, "Starting vmquote API server");
    println!(
        "{} {}",
        yansi::Paint::new("Quote API running on").green(),
        yansi::Paint::new(format!("http://{}/api", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                exit_with("Server error", e);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Stop the process using this port, or pass a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "vmquote",
    author,
    version,
    about = "Price virtual machines and assemble cloud service quotes",
    long_about = r#"vmquote: price VM configurations against the product catalog and assemble quotes
with backup, DR, licensing, professional services, networking, firewall and collocation add-ons.

Examples:
  1) Run the JSON API:
      vmquote serve --port 8080
  2) Price a VM offline:
      vmquote price --vcpus 2 --memory-gb 8 --storage-gb 50 --clock-ghz 2 --file catalog.json
  3) Build a quote from a selection document:
      vmquote quote build selection.json --file catalog.json
"#,
    after_help = "Use `vmquote <subcommand> --help` for subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the JSON API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Validate configuration (env vars / API credentials)
    #[command(about = "Validate configuration and ensure API connectivity.", long_about = "Check that API_BASE_URL and API_TOKEN are set, then fetch the product catalog to confirm the token works.")]
    CheckConfig,
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        sub: CatalogCommands,
    },
    /// Inspect VM templates
    Templates {
        #[command(subcommand)]
        sub: TemplateCommands,
    },
    /// Price one VM specification
    #[command(about = "Price a VM specification", long_about = "Compute the monthly price of a VM from the catalog. Components with no matching catalog product are priced with fallback rates and flagged in the output.")]
    Price {
        #[arg(long)]
        vcpus: f64,
        #[arg(long)]
        memory_gb: f64,
        #[arg(long)]
        storage_gb: f64,
        /// Clock tier in GHz (1 or 2)
        #[arg(long, default_value_t = 2.0)]
        clock_ghz: f64,
        /// Storage tier ("Standard SSD" or "Premium SSD")
        #[arg(long, default_value = "Standard SSD")]
        tier: String,
        /// Catalog JSON file (defaults to CATALOG_FILE, then the backend)
        #[arg(long)]
        file: Option<String>,
    },
    /// Build, submit and deploy quotes
    Quote {
        #[command(subcommand)]
        sub: QuoteCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    #[command(about = "List catalog products", long_about = "List catalog products with their resolved service family. Use --family to show one family (vm, baas, draas, licensing, professional, naas, faas, collocation).")]
    List {
        #[arg(long)]
        family: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    #[command(about = "List VM templates")]
    List {
        /// Small, Medium or Large
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    #[command(about = "Build a quote from a selection document", long_about = "Read a JSON selection document ({\"vms\": [...], \"addons\": [\"product-id\", ...]}), create and price every VM through the wizard rules, select the add-ons and print the resulting quote.")]
    Build {
        selection: String,
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        templates_file: Option<String>,
        /// Print the quote as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Build a quote and submit it to the backend")]
    Submit {
        selection: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        templates_file: Option<String>,
    },
    #[command(about = "Deploy a submitted quote")]
    Deploy { quote_id: String },
}

async fn quote_from_selection(
    state: &AppState,
    selection: &str,
    file: Option<String>,
    templates_file: Option<String>,
) -> Quote {
    let text = match tokio::fs::read_to_string(selection).await {
        Ok(t) => t,
        Err(e) => exit_with("Failed to read selection document", e),
    };
    let doc: SelectionDocument = match serde_json::from_str(&text) {
        Ok(d) => d,
        Err(e) => exit_with("Invalid selection document", e),
    };
    let catalog = match resolve_catalog(state, file).await {
        Ok(c) => c,
        Err(e) => exit_with("Failed to load catalog", e),
    };
    let needs_templates = doc
        .vms
        .iter()
        .any(|vm| vm.build_mode == vmquote::models::BuildMode::Template);
    let templates = if needs_templates {
        match resolve_templates(state, templates_file).await {
            Ok(t) => t,
            Err(e) => exit_with("Failed to load templates", e),
        }
    } else {
        Vec::new()
    };
    let now = chrono::Utc::now().timestamp_millis();
    match apply_selection(&doc, &catalog, &templates, now) {
        Ok(session) => session_quote(&session),
        Err(e) => exit_with("Selection rejected", e),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }
    if cli.silent {
        api::set_silent(true);
    }

    let state = build_state_from_env(cli.env_file.as_deref());

    let Some(command) = cli.command else {
        start_server(state, DEFAULT_HOST, DEFAULT_PORT).await;
        return;
    };
    match command {
        Commands::Serve { host, port } => {
            start_server(state, &host, port).await;
        }
        Commands::CheckConfig => {
            let mut ok = true;
            if std::env::var("API_BASE_URL").map(|v| v.trim().is_empty()).unwrap_or(true) {
                eprintln!("{}", yansi::Paint::new("API_BASE_URL is not configured").red());
                ok = false;
            }
            if state.api_token.trim().is_empty() {
                eprintln!("{}", yansi::Paint::new("API_TOKEN is not configured").red());
                ok = false;
            }
            if !ok {
                process::exit(1);
            }
            match load_catalog(&state.client, &state.api_base_url, &state.api_token).await {
                Ok(catalog) => {
                    println!(
                        "{} ({} products)",
                        yansi::Paint::new("Configuration looks valid").green(),
                        catalog.len()
                    );
                }
                Err(e) => exit_with("Configuration appears invalid", e),
            }
        }
        Commands::Catalog { sub } => match sub {
            CatalogCommands::List { family, file } => {
                let family = match family.map(|f| f.parse::<ServiceFamily>()).transpose() {
                    Ok(f) => f,
                    Err(e) => exit_with("Invalid --family", e),
                };
                match resolve_catalog(&state, file).await {
                    Ok(catalog) => print_catalog(&catalog, family),
                    Err(e) => exit_with("Failed to load catalog", e),
                }
            }
        },
        Commands::Templates { sub } => match sub {
            TemplateCommands::List { group, file } => {
                let group = match group.as_deref().map(|g| g.trim().to_lowercase()) {
                    None => None,
                    Some(g) if g == "small" => Some(TemplateGroup::Small),
                    Some(g) if g == "medium" => Some(TemplateGroup::Medium),
                    Some(g) if g == "large" => Some(TemplateGroup::Large),
                    Some(g) => exit_with("Invalid --group", g),
                };
                match resolve_templates(&state, file).await {
                    Ok(templates) => {
                        let shown: Vec<VmTemplate> = templates
                            .into_iter()
                            .filter(|t| group.map_or(true, |g| t.group == g))
                            .collect();
                        print_templates(&shown);
                    }
                    Err(e) => exit_with("Failed to load templates", e),
                }
            }
        },
        Commands::Price {
            vcpus,
            memory_gb,
            storage_gb,
            clock_ghz,
            tier,
            file,
        } => {
            let tier = match tier.parse::<StorageTier>() {
                Ok(t) => t,
                Err(e) => exit_with("Invalid --tier", e),
            };
            let catalog = match resolve_catalog(&state, file).await {
                Ok(c) => c,
                Err(e) => exit_with("Failed to load catalog", e),
            };
            let spec = VmSpec::new(vcpus, memory_gb, storage_gb, clock_ghz, tier);
            match price_breakdown(&spec, &catalog) {
                Ok(breakdown) => {
                    let mut table = new_table();
                    table.set_header(vec!["Component", "Monthly", "Source"]);
                    table.add_row(leg_row("CPU", &breakdown.cpu));
                    table.add_row(leg_row("Memory", &breakdown.memory));
                    table.add_row(leg_row("Storage", &breakdown.storage));
                    println!("\n{table}");
                    println!(
                        "{} {}\n",
                        yansi::Paint::new("Total per month:").bold(),
                        yansi::Paint::new(format_money(breakdown.total)).green().bold()
                    );
                }
                Err(e) => {
                    println!("{} ({})", format_money(0.0), yansi::Paint::new(e.to_string()).yellow());
                }
            }
        }
        Commands::Quote { sub } => match sub {
            QuoteCommands::Build {
                selection,
                file,
                templates_file,
                json,
            } => {
                let quote = quote_from_selection(&state, &selection, file, templates_file).await;
                if json {
                    match serde_json::to_string_pretty(&quote) {
                        Ok(s) => println!("{}", s),
                        Err(e) => exit_with("Failed to encode quote", e),
                    }
                } else {
                    print_quote(&quote);
                }
            }
            QuoteCommands::Submit {
                selection,
                name,
                email,
                company,
                file,
                templates_file,
            } => {
                let quote = quote_from_selection(&state, &selection, file, templates_file).await;
                print_quote(&quote);
                let customer = CustomerInfo {
                    name,
                    email,
                    company,
                    phone: None,
                };
                match submit_quote(&state.client, &state.api_base_url, &state.api_token, &customer, &quote).await {
                    Ok(id) => println!("{} {}", yansi::Paint::new("Quote submitted:").green(), yansi::Paint::new(id).cyan()),
                    Err(e) => exit_with("Quote submission failed", e),
                }
            }
            QuoteCommands::Deploy { quote_id } => {
                match deploy_quote(&state.client, &state.api_base_url, &state.api_token, &quote_id).await {
                    Ok(data) => println!(
                        "{}\n{}",
                        yansi::Paint::new("Deploy requested:").green(),
                        serde_json::to_string_pretty(&data).unwrap_or_default()
                    ),
                    Err(e) => exit_with("Deploy failed", e),
                }
            }
        },
    }
}
