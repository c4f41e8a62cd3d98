//! Subcommand handlers.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use sowp_client::{AppState, FetchOutcome, ListView, Listable, PaginatedList, SweepOutcome};
use sowp_shared::formatter::plain_text;
use sowp_shared::time::{format_millis, now_millis};
use sowp_store::{CatalogDump, Course, Topic, User};

use crate::cli::{ChatState, Commands, PageArgs};

pub async fn run(state: &AppState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Sweep { force } => {
            let now = now_millis();
            let outcome = if force {
                state.sweeper().force_sweep(now).await?
            } else {
                state.sweeper().maybe_sweep(now).await?
            };
            print_outcome(&outcome)?;
        }

        Commands::Stale => {
            let count = state.sweeper().count_stale(now_millis()).await?;
            println!("{count} message(s) past the retention horizon");
        }

        Commands::Watch => watch(state).await?,

        Commands::Courses { page, sort } => {
            let mut list = state.course_list().await?;
            if let Some(key) = sort {
                list.set_sort(key);
            }
            print_list(&mut list, &page, course_row)?;
        }

        Commands::Topics { course, page, sort } => {
            let mut list = state.topic_list(course).await?;
            if let Some(key) = sort {
                list.set_sort(key);
            }
            print_list(&mut list, &page, topic_row)?;
        }

        Commands::Users { page, sort, filter } => {
            let mut list = state.user_list().await?;
            list.set_facet(filter);
            if let Some(key) = sort {
                list.set_sort(key);
            }
            print_list(&mut list, &page, user_row)?;
        }

        Commands::Feed { pages } => feed(state, pages).await?,

        Commands::Import { path } => import(state, &path).await?,

        Commands::ChatMode { state: wanted } => {
            if let Some(wanted) = wanted {
                state.chat().set_chat_mode(wanted == ChatState::Open).await?;
            }
            let open = state.chat().chat_mode().await?;
            println!("group chat is {}", if open { "open" } else { "closed" });
        }

        Commands::Send { author, role, body } => {
            let message = state.chat().send(&author, &role, &body).await?;
            println!("sent {}", message.key);
        }

        Commands::Log { viewer } => {
            let messages = state.chat().visible_messages(&viewer).await?;
            if messages.is_empty() {
                println!("no messages");
            }
            for m in messages {
                println!(
                    "[{}] {}: {}",
                    format_millis(m.timestamp),
                    m.author,
                    plain_text(&m.body)
                );
            }
        }
    }
    Ok(())
}

/// Periodic sweep attempts until Ctrl+C.  Each attempt respects the
/// cooldown, so a short interval does not cause extra deletions.
async fn watch(state: &AppState) -> anyhow::Result<()> {
    let secs = state.config().sweep_interval_secs;
    info!(interval_secs = secs, "Watching for stale messages");

    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.sweeper().maybe_sweep(now_millis()).await {
                    Ok(outcome) => print_outcome(&outcome)?,
                    Err(e) => error!(error = %e, "sweep failed, retrying next tick"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                return Ok(());
            }
        }
    }
}

async fn feed(state: &AppState, pages: usize) -> anyhow::Result<()> {
    let mut pager = state.course_feed();
    for _ in 0..pages.max(1) {
        match pager.load_more(state.store()).await {
            FetchOutcome::Appended(n) => tracing::debug!(count = n, "page loaded"),
            FetchOutcome::Failed(reason) => anyhow::bail!("loading courses failed: {reason}"),
            FetchOutcome::Exhausted | FetchOutcome::Busy | FetchOutcome::Stale => break,
        }
    }

    if let Some(empty) = pager.empty_state() {
        println!("{}", empty.message());
        return Ok(());
    }
    for course in pager.visible() {
        println!("{}", course_row(course));
    }
    if pager.is_exhausted() {
        println!("-- end of list --");
    }
    Ok(())
}

async fn import(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let dump: CatalogDump =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let summary = state.store().import_catalog(&dump).await?;
    info!(
        courses = summary.courses,
        topics = summary.topics,
        users = summary.users,
        "Catalog imported"
    );
    println!(
        "imported {} course(s), {} topic(s), {} user(s)",
        summary.courses, summary.topics, summary.users
    );
    Ok(())
}

fn print_outcome(outcome: &SweepOutcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

fn print_list<T: Listable>(
    list: &mut PaginatedList<T>,
    args: &PageArgs,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    list.set_search(&args.search);
    list.go_to_page(args.page.saturating_sub(1))?;

    if let Some(summary) = list.summary() {
        println!("{summary}");
    }
    match list.view() {
        ListView::Empty(empty) => println!("{}", empty.message()),
        ListView::Page { items, info } => {
            for item in items {
                println!("{}", row(item));
            }
            println!("{}", info.label());
        }
    }
    Ok(())
}

fn course_row(c: &Course) -> String {
    format!(
        "#{:<5} {:<10} {:<40} {:<20} {} member(s)",
        c.id, c.course_code, c.title, c.instructor, c.members
    )
}

fn topic_row(t: &Topic) -> String {
    format!("#{:<5} {:>3}. {:<40} {} view(s)", t.id, t.order_index, t.name, t.views)
}

fn user_row(u: &User) -> String {
    let verified = if u.email_verified { "verified" } else { "unverified" };
    format!("{:<30} {:<35} {:<10} {}", u.full_name, u.email, u.degree, verified)
}
