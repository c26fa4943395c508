use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use job_aggregator::{
    aggregation::Aggregator,
    board::{BoardSnapshot, ViewUpdate},
    config::Config,
    error::AppError,
    models::{FilterSet, Job, SortOption, SALARY_RANGE_MAX},
    pipeline::{self, ViewState},
    sources::build_sources,
};
use reqwest::Client;
use validator::Validate;

#[derive(Parser)]
#[command(name = "jobs-cli")]
#[command(about = "Job aggregator CLI", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "JOBS_ENDPOINT")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter and sort jobs
    Search(SearchArgs),

    /// List the values available to each filter
    Facets,

    /// Show loading status
    Status,

    /// Re-fetch every source
    Reload,

    /// Check server health
    Health,
}

#[derive(Args)]
struct SearchArgs {
    /// Free-text query; relevance order replaces --sort when given
    #[arg(short, long, default_value = "")]
    query: String,

    #[arg(short, long = "company")]
    companies: Vec<String>,

    /// Location fragment, matched case-insensitively
    #[arg(short, long = "location")]
    locations: Vec<String>,

    #[arg(short, long = "department")]
    departments: Vec<String>,

    #[arg(short = 't', long = "employment-type")]
    employment_types: Vec<String>,

    /// Only remote postings
    #[arg(short, long)]
    remote: bool,

    #[arg(long, default_value_t = 0)]
    salary_min: u64,

    #[arg(long, default_value_t = SALARY_RANGE_MAX)]
    salary_max: u64,

    /// none, alphabetical-asc, alphabetical-desc, salary-asc, salary-desc
    #[arg(short, long, default_value = "none")]
    sort: SortOption,

    /// Fetch and filter in-process instead of asking the service
    #[arg(long)]
    offline: bool,

    /// Print full JSON instead of one line per job
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn filters(&self) -> FilterSet {
        FilterSet::new()
            .with_companies(self.companies.iter().cloned())
            .with_locations(self.locations.iter().cloned())
            .with_departments(self.departments.iter().cloned())
            .with_employment_types(self.employment_types.iter().cloned())
            .with_remote(self.remote)
            .with_salary_range(self.salary_min, self.salary_max)
    }

    fn view(&self) -> ViewState {
        ViewState::new()
            .with_query(self.query.clone())
            .with_filters(self.filters())
            .with_sort(self.sort)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Search(args) => {
            let jobs = if args.offline {
                search_offline(&args).await?
            } else {
                search_remote(&client, &cli.endpoint, &args).await?
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                print_jobs(&jobs);
            }
        }

        Commands::Facets => {
            print_json(client.get(format!("{}/v1/facets", cli.endpoint))).await?;
        }

        Commands::Status => {
            print_json(client.get(format!("{}/v1/status", cli.endpoint))).await?;
        }

        Commands::Reload => {
            print_json(client.post(format!("{}/v1/reload", cli.endpoint))).await?;
        }

        Commands::Health => {
            print_json(client.get(format!("{}/health", cli.endpoint))).await?;
        }
    }

    Ok(())
}

async fn search_remote(client: &Client, endpoint: &str, args: &SearchArgs) -> anyhow::Result<Vec<Job>> {
    let view = args.view();
    let update = ViewUpdate {
        query: Some(view.query),
        filters: Some(view.filters),
        sort: Some(view.sort),
    };

    let response = client
        .put(format!("{}/v1/view", endpoint))
        .json(&update)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", endpoint))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("server returned {}: {}", status, body);
    }

    let snapshot: BoardSnapshot = response.json().await.context("invalid response body")?;
    if let Some(error) = &snapshot.status.error {
        eprintln!("warning: {}", error);
    }
    if snapshot.status.loading || snapshot.status.loading_more {
        eprintln!("note: sources are still loading, results may be incomplete");
    }
    Ok(snapshot.jobs)
}

async fn search_offline(args: &SearchArgs) -> anyhow::Result<Vec<Job>> {
    let view = args.view();
    view.filters.validate().context("invalid filters")?;

    let config = Config::load().context("failed to load configuration")?;
    let sources = build_sources(&config.sources)?;
    let outcome = Aggregator::new(sources).load(|_| {}).await;

    for failure in outcome.failed.iter().cloned() {
        eprintln!("warning: {}", AppError::from(failure));
    }
    let outcome = outcome.into_result()?;

    Ok(pipeline::run(&outcome.jobs, &view))
}

async fn print_json(request: reqwest::RequestBuilder) -> anyhow::Result<()> {
    let response = request.send().await.context("request failed")?;
    let body: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_jobs(jobs: &[Job]) {
    for job in jobs {
        let remote = if job.remote { " (remote)" } else { "" };
        println!(
            "{} | {} | {}{} | {} | {}",
            job.title,
            job.company_name,
            job.location,
            remote,
            job.salary_label(),
            job.url
        );
    }
    println!("{} jobs", jobs.len());
}
