//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sowp_client::catalog::{CourseSort, TopicSort, UserSort, VerificationFilter};
use sowp_shared::constants::PLAIN_USER_ROLE;

#[derive(Parser, Debug)]
#[command(name = "sowp-admin")]
#[command(about = "Maintenance console for the SOWP course platform", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database file (overrides SOWP_DB_PATH).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete chat messages past the retention horizon.
    Sweep {
        /// Ignore the cooldown since the last cleanup.
        #[arg(long)]
        force: bool,
    },

    /// Count messages a sweep would delete now.
    Stale,

    /// Run a sweep attempt every SOWP_SWEEP_INTERVAL_SECS until Ctrl+C.
    Watch,

    /// List courses.
    Courses {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        sort: Option<CourseSort>,
    },

    /// List the topics of one course.
    Topics {
        #[arg(long)]
        course: i64,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        sort: Option<TopicSort>,
    },

    /// List users.
    Users {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        sort: Option<UserSort>,
        /// all, verified or unverified
        #[arg(long, default_value = "all")]
        filter: VerificationFilter,
    },

    /// Newest courses, loaded page by page.
    Feed {
        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },

    /// Import courses, topics and users from a JSON dump.
    Import { path: PathBuf },

    /// Show or change whether the group chat accepts messages.
    ChatMode {
        /// open or closed; omit to show the current mode
        state: Option<ChatState>,
    },

    /// Post a chat message.
    Send {
        #[arg(long)]
        author: String,
        /// Sender role; anything but `User` may post while the chat is closed
        #[arg(long, default_value = PLAIN_USER_ROLE)]
        role: String,
        body: String,
    },

    /// Print the chat as seen by one viewer.
    Log {
        #[arg(long)]
        viewer: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    /// Case-insensitive search.
    #[arg(long, default_value = "")]
    pub search: String,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatState {
    Open,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_flags() {
        let cli = Cli::parse_from([
            "sowp-admin",
            "users",
            "--search",
            "rao",
            "--sort",
            "created",
            "--filter",
            "unverified",
            "--page",
            "2",
        ]);
        let Commands::Users { page, sort, filter } = cli.command else {
            panic!("expected users command");
        };
        assert_eq!(page.search, "rao");
        assert_eq!(page.page, 2);
        assert_eq!(sort, Some(UserSort::Created));
        assert_eq!(filter, VerificationFilter::Unverified);
    }

    #[test]
    fn test_bad_sort_key_is_rejected() {
        assert!(Cli::try_parse_from(["sowp-admin", "courses", "--sort", "age"]).is_err());
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::parse_from(["sowp-admin", "sweep", "--force", "--db", "/tmp/x.db"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Commands::Sweep { force: true }));
    }

    #[test]
    fn test_send_role_defaults_to_plain_user() {
        let cli = Cli::parse_from(["sowp-admin", "send", "--author", "a@x.io", "hi"]);
        assert!(matches!(cli.command, Commands::Send { ref role, .. } if role == "User"));

        let cli = Cli::parse_from([
            "sowp-admin", "send", "--author", "t@x.io", "--role", "Admin", "hi",
        ]);
        assert!(matches!(cli.command, Commands::Send { ref role, .. } if role == "Admin"));
    }
}
