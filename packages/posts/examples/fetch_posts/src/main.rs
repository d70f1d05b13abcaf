#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fetches posts from JSONPlaceholder with a simulated network delay.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package placeholder_posts_fetch_example -- list --limit 5
//! cargo run --package placeholder_posts_fetch_example -- get 3 --delay-ms 0
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};
use placeholder_posts::{Item, PostsClient};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] placeholder_http::Error),
    #[error(transparent)]
    Posts(#[from] placeholder_posts::Error),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base address of the posts API
    #[arg(long, default_value = placeholder_posts::JSONPLACEHOLDER_ORIGIN)]
    origin: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a page of posts
    List {
        #[arg(short, long)]
        limit: Option<u32>,

        /// Simulated delay before the request, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Fetch a single post
    Get {
        #[arg(index = 1)]
        id: u64,

        /// Simulated delay before the request, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

fn print_item(item: &Item) {
    println!("#{} (user {}): {}", item.id, item.user_id, item.title);
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    let args = Args::parse();

    log::info!("args={args:?}");

    let client = PostsClient::builder()
        .with_origin(args.origin)
        .with_http_client(placeholder_http::Client::try_new()?)
        .build();

    match args.cmd {
        Commands::List { limit, delay_ms } => {
            let items = client
                .get_items(limit, delay_ms.map(Duration::from_millis))
                .await?;

            println!("Fetched {} posts", items.len());
            items.iter().for_each(print_item);
        }
        Commands::Get { id, delay_ms } => {
            let item = client
                .get_item_by_id(id, delay_ms.map(Duration::from_millis))
                .await?;

            print_item(&item);
            println!();
            println!("{}", item.body);
        }
    }

    Ok(())
}
