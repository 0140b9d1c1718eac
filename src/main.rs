use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use review_curator::filter::{parse_end_bound, parse_start_bound, ReviewFilter, SortOrder};
use review_curator::models::{Channel, NormalizedReview, ReviewStatus};
use review_curator::service::{ReviewQuery, ReviewService};
use review_curator::{export, logging, report, seed};

#[derive(Parser)]
#[command(name = "review-curator")]
#[command(about = "Review, filter and publish guest reviews across booking channels", long_about = None)]
struct Cli {
    /// JSON array of raw reviews; the built-in sample batch is used when unset
    #[arg(long, env = "REVIEWS_DATA", global = true)]
    data: Option<PathBuf>,
    /// Approve a review before running the command (repeatable)
    #[arg(long = "approve", value_name = "ID", global = true)]
    approve: Vec<i64>,
    /// Withdraw approval before running the command (repeatable)
    #[arg(long = "reject", value_name = "ID", global = true)]
    reject: Vec<i64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List reviews with approval state applied
    Dashboard {
        #[arg(long)]
        listing: Option<String>,
        #[arg(long, value_parser = parse_channel)]
        channel: Option<Channel>,
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,
        #[arg(long, value_parser = parse_status)]
        status: Option<ReviewStatus>,
        #[arg(long)]
        needs_attention: bool,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Print the matching reviews as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the approved reviews of one property
    Property {
        listing_id: String,
        #[arg(long, value_parser = parse_sort, default_value = "date")]
        sort: SortOrder,
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,
    },
    /// Run a listing query and print the JSON response
    Query {
        #[arg(long)]
        listing: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        only_approved: bool,
    },
    /// Submit an approval change as a JSON body, e.g. '{"reviewId":7455,"approved":true}'
    Approve {
        #[arg(long)]
        payload: String,
    },
    /// Print dashboard statistics as JSON
    Stats,
    /// Export reviews with approval state applied to CSV
    Export {
        #[arg(long, default_value = "reviews.csv")]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        listing: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn parse_channel(value: &str) -> Result<Channel, String> {
    Channel::parse(value).ok_or_else(|| format!("unknown channel '{value}'"))
}

fn parse_status(value: &str) -> Result<ReviewStatus, String> {
    ReviewStatus::parse(value).ok_or_else(|| format!("unknown status '{value}'"))
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    match value {
        "date" => Ok(SortOrder::Date),
        "rating" => Ok(SortOrder::Rating),
        _ => Err(format!("unknown sort order '{value}', expected date or rating")),
    }
}

fn print_reviews(reviews: &[NormalizedReview]) {
    if reviews.is_empty() {
        println!("No reviews match these filters.");
        return;
    }
    for review in reviews {
        println!(
            "#{} [{}] {} on {} via {} rated {:.1} ({}){}",
            review.id,
            review.status,
            review.guest_name,
            review.listing_id,
            review.channel,
            review.overall_rating,
            review.sentiment,
            if review.needs_attention { " needs attention" } else { "" }
        );
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let raw = match &cli.data {
        Some(path) => seed::load_raw_reviews(path)?,
        None => seed::sample_reviews(),
    };
    let service = ReviewService::new(&raw);
    info!(reviews = service.reviews().len(), "review service ready");

    for id in &cli.approve {
        service.store().set_approval(*id, true);
    }
    for id in &cli.reject {
        service.store().set_approval(*id, false);
    }

    match cli.command {
        Commands::Dashboard {
            listing,
            channel,
            min_rating,
            status,
            needs_attention,
            search,
            from,
            to,
            json,
        } => {
            let start = match from.as_deref() {
                Some(value) => Some(
                    parse_start_bound(value)
                        .with_context(|| format!("invalid --from date '{value}'"))?,
                ),
                None => None,
            };
            let end = match to.as_deref() {
                Some(value) => Some(
                    parse_end_bound(value).with_context(|| format!("invalid --to date '{value}'"))?,
                ),
                None => None,
            };
            let filter = ReviewFilter {
                listing_id: listing,
                channel,
                min_rating,
                status,
                needs_attention,
                search,
                start,
                end,
            };
            let reviews = service.dashboard(&filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&reviews)?);
            } else {
                println!(
                    "{} reviews found ({} filters active)",
                    reviews.len(),
                    filter.active_count()
                );
                print_reviews(&reviews);
            }
        }
        Commands::Property {
            listing_id,
            sort,
            min_rating,
        } => {
            let page = service.property_reviews(&listing_id, sort, min_rating);
            if page.reviews.is_empty() && min_rating <= 0.0 {
                println!("No approved reviews yet for {listing_id}.");
                return Ok(());
            }
            println!(
                "{}: average {:.1} from approved reviews ({} positive, {} negative)",
                page.listing_id, page.average_rating, page.positive, page.negative
            );
            print_reviews(&page.reviews);
        }
        Commands::Query {
            listing,
            start_date,
            end_date,
            only_approved,
        } => {
            let query = ReviewQuery {
                listing_id: listing,
                start_date,
                end_date,
                only_approved,
            };
            let response = service.query(&query)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Approve { payload } => match service.handle_approval_json(&payload) {
            Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
            Err(err) => bail!("{} (status {})", err, err.status_code()),
        },
        Commands::Stats => {
            let stats = report::review_stats(&service.merged());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Export { out } => {
            let written = export::export_csv(&out, &service.merged())?;
            println!("Exported {written} reviews to {}.", out.display());
        }
        Commands::Report { listing, out } => {
            let filter = match &listing {
                Some(id) => ReviewFilter::new().listing(id.clone()),
                None => ReviewFilter::new(),
            };
            let reviews = service.dashboard(&filter);
            let report = report::build_report(listing.as_deref(), &reviews);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
