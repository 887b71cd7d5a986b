//! Example: print the eco99fm channels, or the streams of one channel
//!
//! Run with: cargo run -p eco99 --example dump_channels [channel_feed_url]

use eco99::extract::{fetch_channels, fetch_playlist};
use eco99::{Eco99ConfigExt, FeedClient, Router};
use eco99config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::load(None)?;
    let client = FeedClient::builder()
        .timeout(config.get_request_timeout())
        .user_agent(config.get_user_agent())
        .build()?;
    let router = Router::new("plugin://plugin.audio.eco99/");

    let records = match std::env::args().nth(1) {
        Some(channel_url) => fetch_playlist(&client, &router, &channel_url)?,
        None => fetch_channels(&client, &router, &config.get_channels_url())?,
    };

    println!("Found {} entries:\n", records.len());
    for record in &records {
        println!("{:>3}. {}", record.index, record.title);
        println!("     cover: {}", record.album_cover);
        println!("     route: {}", record.navigation_url);
    }

    println!("\n{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
