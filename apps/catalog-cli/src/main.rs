mod image_tools;
mod seed;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use database::mongodb::{Database, MongoConfig, connect_from_config_with_retry};
use domain_products::{ImagePolicy, ImagePolicyConfig, MongoProductRepository};
use domain_users::MongoUserRepository;
use domain_visitors::MongoVisitorRepository;
use image_tools::EncodeOptions;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Storefront catalog maintenance")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the demo catalog, skipping names that already exist
    Seed {
        /// Recorded as `created_by` on every seeded product
        #[arg(long, default_value = "system")]
        admin_id: String,
    },
    /// Create product, user and visitor indexes
    Indexes,
    /// Print an image file as base64
    Encode {
        file: PathBuf,
        /// Recompress with the product image settings
        #[arg(long)]
        compress: bool,
        /// Produce a thumbnail instead
        #[arg(long)]
        thumbnail: bool,
    },
    /// Print width, height, format and colour type of an image file
    Inspect { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    match Args::parse().command {
        Command::Seed { admin_id } => {
            let db = connect().await?;
            let report = seed::seed_catalog(&MongoProductRepository::new(&db), &admin_id).await?;
            println!(
                "Seeded {} products ({} already present)",
                report.inserted, report.skipped
            );
        }
        Command::Indexes => {
            let db = connect().await?;
            let products = MongoProductRepository::new(&db).init_indexes().await?;
            let users = MongoUserRepository::new(&db).init_indexes().await?;
            let visitors = MongoVisitorRepository::new(&db).init_indexes().await?;
            let created = [
                ("products", products),
                ("users", users),
                ("visitor_tracks", visitors),
            ];
            for (collection, names) in created {
                println!("{}: {}", collection, names.join(", "));
            }
        }
        Command::Encode {
            file,
            compress,
            thumbnail,
        } => {
            let policy = ImagePolicy::new(ImagePolicyConfig::from_env()?);
            let encoded =
                image_tools::encode_file(&file, &policy, EncodeOptions { compress, thumbnail })?;
            println!("{}", encoded);
        }
        Command::Inspect { file } => {
            let info = image_tools::inspect_file(&file)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}

async fn connect() -> Result<Database> {
    let config = MongoConfig::from_env()?;
    info!("Connecting to MongoDB at {}", config.url());
    let client = connect_from_config_with_retry(&config, None).await?;
    Ok(client.database(config.database()))
}
