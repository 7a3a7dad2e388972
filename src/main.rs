use anyhow::{bail, Context, Result};
use serde::Serialize;
use simplegov::{
    comments::CommentSink,
    config::{SheetsConfig, ENV_CONFIG_PATH},
    records::CommentRecord,
    sort::{parse_sort_spec, DonorField, LegislationField, SortDirection},
    Dashboard, SheetClient,
};
use std::{env, path::PathBuf, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: simplegov [CONFIG.yaml] [--sort-donors FIELD[:asc|desc]] \
[--sort-legislation FIELD[:asc|desc]] [--comment AUTHOR:TEXT]";

#[derive(Default)]
struct Args {
    config: Option<PathBuf>,
    sort_donors: Option<(DonorField, SortDirection)>,
    sort_legislation: Option<(LegislationField, SortDirection)>,
    comment: Option<(String, String)>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut out = Args::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{} needs a value\n{}", flag, USAGE))
        };
        match arg.as_str() {
            "--sort-donors" => out.sort_donors = Some(parse_sort_spec(&value(&arg)?)?),
            "--sort-legislation" => out.sort_legislation = Some(parse_sort_spec(&value(&arg)?)?),
            "--comment" => {
                let raw = value(&arg)?;
                let (author, text) = raw
                    .split_once(':')
                    .with_context(|| format!("--comment expects AUTHOR:TEXT, got {:?}", raw))?;
                out.comment = Some((author.to_string(), text.to_string()));
            }
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
            path if out.config.is_none() => out.config = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument {}\n{}", extra, USAGE),
        }
    }
    Ok(out)
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    dashboard: &'a Dashboard,
    board: Vec<CommentRecord>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) args & config ────────────────────────────────────────────
    let args = parse_args(env::args().skip(1))?;
    let config_path = match args.config.clone() {
        Some(p) => p,
        None => env::var(ENV_CONFIG_PATH).map(PathBuf::from).with_context(|| {
            format!("no config path given and {} is not set\n{}", ENV_CONFIG_PATH, USAGE)
        })?,
    };
    let config = SheetsConfig::load(&config_path)?;
    let client = SheetClient::new(&config)?;

    // ─── 3) fetch all sheets ─────────────────────────────────────────
    let mut dashboard = Dashboard::load(&client).await;

    // ─── 4) sort on request ──────────────────────────────────────────
    if let Some((field, dir)) = args.sort_donors {
        dashboard.sort_donors(field, dir);
    }
    if let Some((field, dir)) = args.sort_legislation {
        dashboard.sort_legislation(field, dir);
    }

    // ─── 5) optional comment ─────────────────────────────────────────
    let board = Arc::new(dashboard.comment_board());
    if let Some((author, text)) = &args.comment {
        let sink =
            CommentSink::from_config(&config.comment_sink, client.http().clone(), board.clone());
        match sink.submit(author, text).await {
            Ok(c) => info!(id = c.id, sink = sink.kind(), "comment added"),
            Err(e) => error!(sink = sink.kind(), error = %e, "comment failed"),
        }
    }

    // ─── 6) print ────────────────────────────────────────────────────
    let output = Output {
        dashboard: &dashboard,
        board: board.snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    info!("all done");
    Ok(())
}
