use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use clap::Parser;
use log::{debug, error, info, warn};
use serde::Deserialize;
use serenity::model::id::{ChannelId, MessageId};
use tokio::sync::Mutex;

mod command_handlers;
mod discord;
mod helpers;
mod positioner;
mod render;
mod store;


use command_handlers::*;
use helpers::*;
use positioner::*;
use render::*;
use store::*;

const TOKEN_ENV: &str = "TOKEN";

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    token: Option<String>,
    guild_id: Option<u64>,
    utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone)]
struct Config {
    token: String,
    guild_id: Option<u64>,
    utc_offset_minutes: Option<i32>,
}

#[derive(Parser, Debug)]
struct Args {
    /// Optional TOML config; the TOKEN environment variable overrides its token.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// A channel's journal for a single calendar day.
#[derive(Clone, Debug, PartialEq)]
struct JournalState {
    date: String,
    entries: Vec<String>,
    last_message_id: Option<MessageId>,
}

/// A channel's open tasks. Display numbers are `index + 1`.
#[derive(Clone, Debug, Default, PartialEq)]
struct TaskListState {
    tasks: Vec<String>,
    last_message_id: Option<MessageId>,
}

struct AppState {
    config: Config,
    store: ChannelStore,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref(), std::env::var(TOKEN_ENV).ok())?;

    let state = Arc::new(AppState {
        config,
        store: ChannelStore::new(),
    });

    discord::run(state).await
}
