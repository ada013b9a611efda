use analytics::AnalyticsEngine;
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use database::{connect, run_migrations, DbRepository};
use std::net::SocketAddr;
use uuid::Uuid;

/// The main entry point for the Pledgefolio application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file when present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = configuration::load_config()?;

    match cli.command {
        Commands::Serve(args) => {
            let host = args.host.unwrap_or(config.server.host.clone());
            let port = args.port.unwrap_or(config.server.port);
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            web_server::run_server(addr, config.analytics).await
        }
        Commands::Report(args) => handle_report(args, config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A backend for tracking Kickstarter crowdfunding investments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Print a portfolio analytics report to the terminal.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Host to bind, overriding config.toml.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding config.toml.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ReportArgs {
    /// Scope the report to one user's portfolio.
    #[arg(long)]
    user_id: Option<Uuid>,

    /// Emit the raw dashboard payload as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Fetches the scoped portfolio, runs the analytics engine over it, and
/// renders the dashboard to the terminal.
async fn handle_report(args: ReportArgs, config: configuration::Config) -> anyhow::Result<()> {
    let db_pool = connect().await?;
    run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);
    let engine = AnalyticsEngine::new(config.analytics)?;

    let projects = db_repo.projects_for_user(args.user_id).await?;
    let investments = db_repo.investments_for_user(args.user_id).await?;
    let report = engine.dashboard(&projects, &investments, Utc::now())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut overview = Table::new();
    overview
        .set_header(vec!["Metric", "Value"])
        .add_row(vec![
            "Projects".to_string(),
            report.overview.total_projects.to_string(),
        ])
        .add_row(vec![
            "Fully funded".to_string(),
            report.overview.fully_funded_projects.to_string(),
        ])
        .add_row(vec![
            "Investments".to_string(),
            report.overview.total_investments.to_string(),
        ])
        .add_row(vec![
            "Total invested".to_string(),
            format!("${}", report.overview.total_invested),
        ])
        .add_row(vec![
            "Expected value".to_string(),
            format!("${}", report.overview.total_expected_value),
        ])
        .add_row(vec![
            "Overall ROI".to_string(),
            format!("{}%", report.overview.overall_roi_pct),
        ])
        .add_row(vec![
            "Success rate".to_string(),
            format!("{}%", report.overview.success_rate_pct),
        ]);
    println!("Portfolio overview\n{overview}");

    let mut risk = Table::new();
    risk.set_header(vec!["Risk", "Projects"])
        .add_row(vec![
            "Low".to_string(),
            report.risk.risk_distribution.low.to_string(),
        ])
        .add_row(vec![
            "Medium".to_string(),
            report.risk.risk_distribution.medium.to_string(),
        ])
        .add_row(vec![
            "High".to_string(),
            report.risk.risk_distribution.high.to_string(),
        ]);
    println!(
        "\nRisk distribution (concentration index: {})\n{risk}",
        report.risk.concentration_index
    );

    let mut roi = Table::new();
    roi.set_header(vec!["Horizon (months)", "Projected ROI"]);
    for (months, pct) in &report.roi.predictions {
        roi.add_row(vec![months.to_string(), format!("{pct}%")]);
    }
    println!("\nROI projection\n{roi}");

    if !report.trends.is_empty() {
        let mut trends = Table::new();
        trends.set_header(vec!["Project", "Velocity (%/day)", "Success probability"]);
        for point in &report.trends {
            trends.add_row(vec![
                point.name.clone(),
                point.velocity_pct_per_day.to_string(),
                format!("{}%", point.success_probability),
            ]);
        }
        println!("\nLive funding trends\n{trends}");
    }

    println!("\nRecommendations:");
    for recommendation in &report.risk.recommendations {
        println!("  - {recommendation}");
    }

    Ok(())
}
