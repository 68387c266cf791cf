mod cli;

use reelstream::config::{self, Config};
use reelstream::server;
use reelstream_common::paths::resolve_media_path;
use reelstream_common::VideoId;
use reelstream_db::pool::{get_conn, init_pool, DbPool};
use reelstream_db::queries::videos;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

/// Catalog location: explicit config value, else next to the config file.
fn database_path(config: &Config, config_path: Option<&Path>) -> PathBuf {
    if let Some(path) = &config.storage.database_path {
        return path.clone();
    }

    let data_dir = config_path
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    data_dir.join("reelstream.db")
}

fn open_catalog(config: &Config, config_path: Option<&Path>) -> Result<DbPool> {
    let db_path = database_path(config, config_path);
    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Opening catalog at {}", db_path_str);

    init_pool(&db_path_str, config.database.pool_size)
        .with_context(|| format!("Failed to open catalog database {:?}", db_path))
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting reelstream server");
    tracing::info!("Serving videos from {:?}", config.storage.media_root);

    let db_pool = open_catalog(&config, config_path)?;

    server::start_server(config, db_pool).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelstream=trace,reelstream_db=debug,tower_http=debug".to_string()
        } else {
            "reelstream=info,reelstream_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Add {
            id,
            path,
            extension,
            size,
        } => add_video(cli.config.as_deref(), &id, &path, &extension, size),
        Commands::Show { id } => show_video(cli.config.as_deref(), &id),
        Commands::Remove { id } => remove_video(cli.config.as_deref(), &id),
        Commands::List { json } => list_videos(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelstream {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn add_video(
    config_path: Option<&Path>,
    id: &str,
    path: &str,
    extension: &str,
    size: Option<u64>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let id: VideoId = id.parse().context("Invalid video id")?;

    let file_path = resolve_media_path(&config.storage.media_root, path, extension)
        .context("Invalid video path")?;

    let size = match size {
        Some(size) => Some(size),
        None => match std::fs::metadata(&file_path) {
            Ok(meta) => Some(meta.len()),
            Err(e) => {
                tracing::warn!("Could not stat {:?}: {}; size left unknown", file_path, e);
                None
            }
        },
    };

    let pool = open_catalog(&config, config_path)?;
    let conn = get_conn(&pool)?;
    let video = videos::create_video(&conn, &id, path, extension, size)?;

    println!("Registered video {} -> {}", video.id, file_path.display());
    Ok(())
}

fn show_video(config_path: Option<&Path>, id: &str) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let id: VideoId = id.parse().context("Invalid video id")?;

    let pool = open_catalog(&config, config_path)?;
    let conn = get_conn(&pool)?;
    let video = videos::get_video(&conn, &id)?;

    let file_path = resolve_media_path(&config.storage.media_root, &video.path, &video.extension)
        .context("Catalog entry has an invalid path")?;

    println!("Video {}", video.id);
    println!("  File: {}", file_path.display());
    match video.size_bytes {
        Some(size) => println!("  Size: {} bytes", size),
        None => println!("  Size: unknown"),
    }
    println!("  Registered: {}", video.created_at.format("%Y-%m-%d %H:%M:%S"));
    if !file_path.is_file() {
        println!("  Warning: file is missing on disk");
    }

    Ok(())
}

fn remove_video(config_path: Option<&Path>, id: &str) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let id: VideoId = id.parse().context("Invalid video id")?;

    let pool = open_catalog(&config, config_path)?;
    let conn = get_conn(&pool)?;
    if !videos::delete_video(&conn, &id)? {
        anyhow::bail!("Video {} is not in the catalog", id);
    }

    // Running servers keep serving a cached record until it expires or they restart
    println!("Removed video {}", id);
    Ok(())
}

fn list_videos(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_catalog(&config, config_path)?;
    let conn = get_conn(&pool)?;
    let all = videos::list_videos(&conn)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    if all.is_empty() {
        println!("No videos registered");
        return Ok(());
    }

    for video in all {
        let size = video
            .size_bytes
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{}\t{}{}\t{} bytes\t{}",
            video.id,
            video.path,
            video.extension,
            size,
            video.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("{} video(s) registered", videos::count_videos(&conn)?);

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Media root: {:?}", config.storage.media_root);
            println!("  Chunk size: {} bytes", config.streaming.chunk_size);
            println!("  Malformed ranges: {:?}", config.streaming.malformed_range);
            println!("  Cache entries: {}", config.cache.max_entries);
            match config.cache.ttl_secs {
                Some(ttl) => println!("  Cache TTL: {}s", ttl),
                None => println!("  Cache TTL: none"),
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Chunk size: {} bytes", config.streaming.chunk_size);
        }
    }

    Ok(())
}
