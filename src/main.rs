use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{StatefulWidget, Widget},
};
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::FmtSubscriber;
use unicode_width::UnicodeWidthStr;

use cyrum_presence::config::Config;
use cyrum_presence::presence::{Clock, FixedClock, PresenceIndex, SystemClock};
use cyrum_presence::store::{ChatState, Store};
use cyrum_presence::theme::ThemeContext;
use cyrum_presence::widgets::{ActivityLabel, ActivityLabelState, Label, SectionHeader, SectionHeaderState};

#[cfg(test)]
mod main_tests;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Presence configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Humanize relative to this instant instead of the wall clock (RFC 3339)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Maximum log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the activity line for each user in a presence snapshot
    Show {
        /// JSON object mapping user ids to presence records
        #[arg(long)]
        presences: PathBuf,

        /// Only show this user
        #[arg(long)]
        user: Option<String>,
    },
    /// Draw a themed section header followed by activity labels
    Render {
        /// JSON object mapping user ids to presence records
        #[arg(long)]
        presences: PathBuf,

        /// Section header text
        #[arg(long, default_value = "Members")]
        title: String,

        /// Width of the drawing area
        #[arg(long, default_value_t = 48)]
        width: u16,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_level, cli.log_file.as_deref())?;

    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    let clock: Box<dyn Clock> = match cli.now {
        Some(now) => Box::new(FixedClock::new(now)),
        None => Box::new(SystemClock),
    };

    match cli.command {
        Commands::Show { presences, user } => {
            let store = Store::new(ChatState::new(load_presences(&presences)?));
            show(&store, &config, clock.as_ref(), user.as_deref())?;
        },
        Commands::Render { presences, title, width } => {
            let store = Store::new(ChatState::new(load_presences(&presences)?));
            render(&store, &config, clock.as_ref(), &title, width)?;
        },
    }

    Ok(())
}

fn init_logging(level: Level, log_file: Option<&Path>) -> Result<WorkerGuard> {
    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path.file_name().context("Log file path has no file name")?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
        },
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

fn load_presences(path: &Path) -> Result<PresenceIndex> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read presence snapshot {}", path.display()))?;
    let index: PresenceIndex = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse presence snapshot {}", path.display()))?;
    info!(users = index.len(), "Loaded presence snapshot");
    Ok(index)
}

fn user_ids(store: &Store<ChatState>, only: Option<&str>) -> Vec<String> {
    match only {
        Some(user) => vec![user.to_string()],
        None => store.with_state(|state| {
            state.presences.user_ids().into_iter().map(str::to_string).collect()
        }),
    }
}

fn show(store: &Store<ChatState>, config: &Config, clock: &dyn Clock, only: Option<&str>) -> Result<()> {
    let humanizer = config.humanizer()?;

    for user_id in user_ids(store, only) {
        let label = ActivityLabel::new(&user_id).humanizer(&humanizer).clock(clock);
        let text = store.with_state(|state| label.text(&state.presences));
        println!("{user_id}: {}", text.as_deref().unwrap_or("(no activity)"));
    }

    Ok(())
}

/// Columns for the user id column: widest id in display cells plus a gap, at most half the row
fn name_column_width(users: &[String], width: u16) -> u16 {
    let widest = users.iter().map(|user| user.width()).max().unwrap_or(0);
    u16::try_from(widest + 1).unwrap_or(u16::MAX).min(width / 2)
}

fn render(store: &Store<ChatState>, config: &Config, clock: &dyn Clock, title: &str, width: u16) -> Result<()> {
    let humanizer = config.humanizer()?;
    let users = user_ids(store, None);
    let height = u16::try_from(users.len() + 1).context("Too many users to draw")?;
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);

    let name_width = name_column_width(&users, width);

    let _theme = ThemeContext::provide(config.theme()?);

    let mut header = SectionHeaderState::new();
    StatefulWidget::render(SectionHeader::new(title), Rect::new(0, 0, width, 1), &mut buf, &mut header);

    for (row, user_id) in users.iter().enumerate() {
        let y = row as u16 + 1;
        Label::new(user_id.as_str())
            .style(Style::default())
            .render(Rect::new(0, y, name_width, 1), &mut buf);

        let mut state = ActivityLabelState::connect(store, user_id.as_str());
        ActivityLabel::new(user_id).humanizer(&humanizer).clock(clock).render(
            Rect::new(name_width, y, width.saturating_sub(name_width), 1),
            &mut buf,
            &mut state,
        );
    }

    for y in 0..area.height {
        let line: String = (0..area.width).map(|x| buf[(x, y)].symbol()).collect();
        println!("{}", line.trim_end());
    }

    Ok(())
}
