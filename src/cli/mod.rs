//! Command-line interface for zenblog.
//!
//! Provides commands for reading blog content through the public API and
//! for managing a blog's media across the bucket and the external host.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::adapters::{DashboardClient, SupabaseClient};
use crate::config::{self, ResolvedConfig};
use crate::core::MediaLibrary;
use crate::domain::{Hosting, MediaRef, NewBlogImage};
use crate::sdk::{CacheMode, GetOptions, PostListParams, ZenblogClient};

/// zenblog - Client for the Zenblog headless CMS
#[derive(Parser, Debug)]
#[command(name = "zenblog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Blog ID (defaults to ZENBLOG_BLOG_ID or the config file)
    #[arg(short, long, global = true)]
    pub blog: Option<String>,

    /// Log every API, storage and dashboard request
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Published posts
    Posts {
        #[command(subcommand)]
        command: PostsCommands,
    },

    /// List categories
    Categories,

    /// List tags
    Tags,

    /// Blog authors
    Authors {
        #[command(subcommand)]
        command: AuthorsCommands,
    },

    /// Manage blog media
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum PostsCommands {
    /// List posts
    List {
        #[arg(short, long, default_value = "20")]
        limit: u32,

        #[arg(short, long, default_value = "0")]
        offset: u32,

        /// Category slug
        #[arg(long)]
        category: Option<String>,

        /// Tag slugs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Author slug
        #[arg(long)]
        author: Option<String>,

        /// Cache mode (default, no-store, reload, no-cache, force-cache, only-if-cached)
        #[arg(long, default_value = "default")]
        cache: CacheMode,
    },

    /// Show a post by slug
    Get {
        slug: String,

        #[arg(long, default_value = "default")]
        cache: CacheMode,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthorsCommands {
    /// List authors
    List,

    /// Show an author by slug
    Get {
        slug: String,

        #[arg(long, default_value = "default")]
        cache: CacheMode,
    },
}

#[derive(Subcommand, Debug)]
pub enum MediaCommands {
    /// List bucket and external media, newest first
    List,

    /// Upload a file to the bucket
    Upload {
        file: PathBuf,

        /// Object name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Record an externally hosted image
    AddExternal {
        /// Public URL of the image
        url: String,

        /// File name (defaults to the last URL segment)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        size: Option<u64>,
    },

    /// Delete media from both backends
    Delete {
        /// Bucket object paths (`{blog_id}/{name}`)
        paths: Vec<String>,

        /// Externally hosted image paths or URLs
        #[arg(long = "external")]
        external: Vec<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = config::config()?;
        let blog = self.blog.as_deref();
        let debug = self.debug;

        match self.command {
            Commands::Posts { command } => run_posts(config, blog, debug, command).await,
            Commands::Categories => {
                let client = build_client(config, blog, debug)?;
                print_json(&client.categories().list().await?)
            }
            Commands::Tags => {
                let client = build_client(config, blog, debug)?;
                print_json(&client.tags().list().await?)
            }
            Commands::Authors { command } => run_authors(config, blog, debug, command).await,
            Commands::Media { command } => run_media(config, blog, debug, command).await,
            Commands::Config => show_config(config),
        }
    }
}

fn build_client(config: &ResolvedConfig, blog: Option<&str>, debug: bool) -> Result<ZenblogClient> {
    let options = config.client_options(blog)?;
    let options = if debug { options.with_debug(true) } else { options };
    Ok(ZenblogClient::new(options)?)
}

fn build_media_library(config: &ResolvedConfig, debug: bool) -> Result<MediaLibrary> {
    let url = config
        .supabase_url
        .clone()
        .context("SUPABASE_URL is required for media commands")?;
    let key = config
        .supabase_key
        .clone()
        .context("SUPABASE_KEY is required for media commands")?;

    let supabase = Arc::new(
        SupabaseClient::new(url, key)
            .with_bucket(config.bucket.clone())
            .with_table(config.table.clone())
            .with_debug(debug),
    );
    let dashboard = Arc::new(
        DashboardClient::new(config.dashboard_url.clone(), config.dashboard_token.clone())
            .with_debug(debug),
    );

    Ok(MediaLibrary::new(supabase.clone(), supabase, dashboard))
}

fn resolve_blog_id(config: &ResolvedConfig, blog: Option<&str>) -> Result<String> {
    blog.map(str::to_string)
        .or_else(|| config.blog_id.clone())
        .context("No blog id given. Pass --blog or set ZENBLOG_BLOG_ID")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_posts(
    config: &ResolvedConfig,
    blog: Option<&str>,
    debug: bool,
    command: PostsCommands,
) -> Result<()> {
    let client = build_client(config, blog, debug)?;

    match command {
        PostsCommands::List {
            limit,
            offset,
            category,
            tags,
            author,
            cache,
        } => {
            let params = PostListParams {
                limit,
                offset,
                cache,
                category,
                tags,
                author,
            };
            print_json(&client.posts().list(params).await?)
        }
        PostsCommands::Get { slug, cache } => {
            print_json(&client.posts().get(&slug, GetOptions::with_cache(cache)).await?)
        }
    }
}

async fn run_authors(
    config: &ResolvedConfig,
    blog: Option<&str>,
    debug: bool,
    command: AuthorsCommands,
) -> Result<()> {
    let client = build_client(config, blog, debug)?;

    match command {
        AuthorsCommands::List => print_json(&client.authors().list().await?),
        AuthorsCommands::Get { slug, cache } => {
            print_json(&client.authors().get(&slug, GetOptions::with_cache(cache)).await?)
        }
    }
}

async fn run_media(
    config: &ResolvedConfig,
    blog: Option<&str>,
    debug: bool,
    command: MediaCommands,
) -> Result<()> {
    let blog_id = resolve_blog_id(config, blog)?;
    let library = build_media_library(config, debug || config.debug)?;

    match command {
        MediaCommands::List => print_json(&library.list_media(&blog_id).await?),
        MediaCommands::Upload { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .context("Upload path has no file name")?,
            };
            let body = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            let content_type = mime_guess::from_path(&file)
                .first_or_octet_stream()
                .to_string();

            let key = library
                .upload_media(&format!("{}/{}", blog_id, name), body, &content_type)
                .await?;
            eprintln!("Uploaded {}", key);
            Ok(())
        }
        MediaCommands::AddExternal { url, name, size } => {
            let file_name = match name {
                Some(name) => name,
                None => MediaRef::new(url.as_str(), Hosting::External, blog_id.as_str())
                    .file_name()
                    .map(str::to_string)
                    .context("Could not derive a file name from the URL; pass --name")?,
            };
            let item = library
                .register_external(NewBlogImage {
                    blog_id,
                    file_url: url,
                    file_name,
                    size_in_bytes: size,
                })
                .await?;
            print_json(&item)
        }
        MediaCommands::Delete { paths, external } => {
            let refs: Vec<MediaRef> = paths
                .into_iter()
                .map(|p| MediaRef::new(p, Hosting::Bucket, blog_id.as_str()))
                .chain(
                    external
                        .into_iter()
                        .map(|p| MediaRef::new(p, Hosting::External, blog_id.as_str())),
                )
                .collect();

            if refs.is_empty() {
                anyhow::bail!("Nothing to delete. Pass bucket paths and/or --external <path>");
            }

            let report = library.delete_media(&refs).await?;
            print_json(&report)
        }
    }
}

/// Show resolved configuration
fn show_config(config: &ResolvedConfig) -> Result<()> {
    let unset = "(unset)";
    let config_file = config
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());

    println!("Config file: {}", config_file);
    println!("Blog ID: {}", config.blog_id.as_deref().unwrap_or(unset));
    println!("API URL: {}", config.api_url);
    println!("Debug: {}", config.debug);
    println!("Dashboard URL: {}", config.dashboard_url);
    println!("Supabase URL: {}", config.supabase_url.as_deref().unwrap_or(unset));
    println!(
        "Supabase key: {}",
        if config.supabase_key.is_some() { "(set)" } else { unset }
    );
    println!("Bucket: {}", config.bucket);
    println!("Table: {}", config.table);
    Ok(())
}
