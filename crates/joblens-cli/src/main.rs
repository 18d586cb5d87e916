use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use joblens_client::JobsClient;
use joblens_core::{DatePostedBucket, SalaryRange, SortOrder};
use joblens_screen::{ScreenVariant, SearchScreen};
use joblens_suggest::local_suggestions;

#[derive(Debug, Parser)]
#[command(name = "joblens-cli")]
#[command(about = "Joblens job-search command-line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the job list and print a summary.
    Fetch,
    /// Fetch, filter, sort, and print one page of results.
    Search {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "")]
        job_type: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        min_salary: String,
        #[arg(long, default_value = "")]
        max_salary: String,
        /// One of 24h, 3d, 7d, 30d; empty means any.
        #[arg(long, default_value = "")]
        posted: String,
        /// asc or desc by salary; empty preserves order.
        #[arg(long, default_value = "")]
        sort: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print title/company suggestions for a prefix.
    Suggest { prefix: String },
    /// Query the remote city suggestion endpoint.
    Cities { prefix: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = JobsClient::from_env()?;

    match cli.command {
        Commands::Fetch => {
            let jobs = client.fetch_jobs().await?;
            println!("fetched {} jobs from {}", jobs.len(), client.base_url());
            for job in jobs.iter().take(5) {
                println!("  {} @ {} ({})", job.title, job.company, job.location);
            }
        }
        Commands::Search {
            query,
            job_type,
            city,
            min_salary,
            max_salary,
            posted,
            sort,
            page,
        } => {
            let jobs = client.fetch_jobs().await?;
            let mut screen = SearchScreen::new(ScreenVariant::Desktop);
            let now = Utc::now();
            screen.set_working_set(jobs, now);
            screen.edit_criteria(now, |criteria| {
                criteria.query = query;
                criteria.job_type = job_type;
                criteria.city = city;
                criteria.min_salary = min_salary;
                criteria.max_salary = max_salary;
                criteria.date_posted = DatePostedBucket::parse(&posted);
                criteria.sort = SortOrder::parse(&sort);
            });
            for _ in 1..page {
                screen.next_page();
            }

            let top = screen.top_salary_ids();
            println!(
                "{} matches, page {}/{}",
                screen.ordered().len(),
                screen.current_page(),
                screen.total_pages()
            );
            for job in screen.displayed() {
                let range = SalaryRange::parse(&job.salary_min, &job.salary_max);
                let marker = if top.contains(&job.id) { "*" } else { " " };
                println!(
                    "{marker} {} @ {} [{} - {}]",
                    job.title, job.company, range.min, range.max
                );
            }
            if let Some(selected) = screen.selected_id() {
                println!("selected: {selected}");
            }
        }
        Commands::Suggest { prefix } => {
            let jobs = client.fetch_jobs().await?;
            for suggestion in local_suggestions(&jobs, &prefix) {
                println!("{suggestion}");
            }
        }
        Commands::Cities { prefix } => {
            let cities = client.fetch_cities(&prefix).await?;
            for city in cities {
                println!("{}", city.name);
            }
        }
    }

    Ok(())
}
