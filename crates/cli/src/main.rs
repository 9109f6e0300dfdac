mod api_client;

use anyhow::{Context, Result};
use api_client::{ApiClient, CreateProductRequest, ReviewResponse};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalogctl")]
#[command(about = "Administrative CLI for the product catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ApiArgs {
    /// Server API URL
    #[arg(
        long,
        global = true,
        env = "CATALOG_SERVER",
        default_value = "http://127.0.0.1:8080"
    )]
    server: String,

    /// Admin token
    #[arg(long, global = true, env = "CATALOG_TOKEN")]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Moderate reviews
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Check server health
    Health {
        #[command(flatten)]
        api: ApiArgs,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Create a new product
    Create {
        /// Product name
        #[arg(short, long)]
        name: String,
        /// Category the product is listed under
        #[arg(short, long)]
        category: String,
        /// Unit price
        #[arg(short, long)]
        price: f64,
        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Recompute a product's rating from its approved reviews
    Rerate {
        /// Product ID
        product_id: i64,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// List reviews by moderation status (oldest first)
    List {
        /// Status to list: pending, approved or rejected
        #[arg(short, long, default_value = "pending")]
        status: String,
    },
    /// Approve a pending review
    Approve {
        /// Review ID
        review_id: i64,
    },
    /// Reject a pending review
    Reject {
        /// Review ID
        review_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Product { command, api } => handle_product_command(command, &api).await,
        Commands::Review { command, api } => handle_review_command(command, &api).await,
        Commands::Health { api } => handle_health_command(&api).await,
    }
}

fn normalize_base_url(url: &str) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("server URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn get_api_client(api: &ApiArgs) -> Result<ApiClient> {
    let token = api
        .token
        .as_deref()
        .context("admin token required: pass --token or set CATALOG_TOKEN")?;
    let base_url = normalize_base_url(&api.server)?;
    tracing::debug!(server = %base_url, "Using catalog server");
    ApiClient::new(&base_url, token)
}

async fn handle_product_command(command: ProductCommands, api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api)?;

    match command {
        ProductCommands::Create {
            name,
            category,
            price,
            description,
        } => {
            let product = client
                .create_product(CreateProductRequest {
                    name,
                    category,
                    price,
                    description,
                })
                .await
                .context("failed to create product")?;

            println!("Product created:");
            println!("  ID: {}", product.product_id);
            println!("  Name: {}", product.name);
            println!("  Category: {}", product.category);
            println!("  Price: {:.2}", product.price);
            println!("  Rating: {:.1}", product.rating);
            if let Some(description) = product.description {
                println!("  Description: {}", description);
            }
            println!("  Created: {}", product.created_at);
        }
        ProductCommands::Rerate { product_id } => {
            let rating = client
                .recompute_rating(product_id)
                .await
                .with_context(|| format!("failed to recompute rating of product {product_id}"))?;
            println!(
                "Product {} rating: {:.2}",
                rating.product_id, rating.product_rating
            );
        }
    }

    Ok(())
}

async fn handle_review_command(command: ReviewCommands, api: &ApiArgs) -> Result<()> {
    let client = get_api_client(api)?;

    let (review_id, status) = match command {
        ReviewCommands::List { status } => {
            let reviews = client.list_reviews(Some(&status)).await?;
            print_reviews(&status, &reviews);
            return Ok(());
        }
        ReviewCommands::Approve { review_id } => (review_id, "approved"),
        ReviewCommands::Reject { review_id } => (review_id, "rejected"),
    };

    let outcome = client
        .set_review_status(review_id, status)
        .await
        .with_context(|| format!("failed to mark review {review_id} as {status}"))?;
    println!(
        "Review {} is now {} (product {} rating: {:.2})",
        outcome.review.review_id,
        outcome.review.status,
        outcome.review.product_id,
        outcome.product_rating
    );

    Ok(())
}

fn print_reviews(status: &str, reviews: &[ReviewResponse]) {
    if reviews.is_empty() {
        println!("No {} reviews.", status);
        return;
    }

    println!(
        "{:<8} {:<10} {:<6} {:<20} {:<26} Comment",
        "ID", "Product", "Rating", "User", "Created"
    );
    println!("{}", "-".repeat(100));
    for review in reviews {
        println!(
            "{:<8} {:<10} {:<6} {:<20} {:<26} {}",
            review.review_id,
            review.product_id,
            review.rating,
            review.user_name,
            review.created_at,
            truncate(&review.comment, 60)
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut out: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

async fn handle_health_command(api: &ApiArgs) -> Result<()> {
    let base_url = normalize_base_url(&api.server)?;
    let client = ApiClient::new(&base_url, api.token.as_deref().unwrap_or_default())?;
    let health = client.health().await?;
    println!("Status: {}", health.status);
    println!("Version: {}", health.version);
    Ok(())
}
