//! Command line definition.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::commands::{EntityKind, IndexMode};

/// Keeps the search indices in step with the relational store.
#[derive(Debug, Parser)]
#[command(name = "search-indexer", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create indices and any missing aliases.
    CreateIndices {
        /// Force recreation if an index already exists.
        #[arg(long)]
        force: bool,
    },

    /// Index records into the current indices.
    Index(IndexArgs),

    /// Update aliases to refer to the current indices.
    UpdateAlias {
        /// Log the changes instead of making them.
        #[arg(long)]
        explain: bool,

        /// Promote only this index.
        #[arg(long, value_name = "INDEX")]
        set: Option<String>,
    },

    /// Remove indices no alias refers to.
    CleanupIndices {
        /// Log the deletions instead of making them.
        #[arg(long)]
        explain: bool,
    },
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Index all records for the chosen entities.
    #[arg(long)]
    pub all: bool,

    /// Start of the id range.
    #[arg(long, default_value_t = 0)]
    pub from: i64,

    /// End of the id range.
    #[arg(long, default_value_t = 100)]
    pub to: i64,

    /// Number of ids read from the database per query.
    #[arg(long, default_value_t = 10000, value_parser = clap::value_parser!(u32).range(1..))]
    pub batch_size: u32,

    /// Index records updated from this RFC 3339 timestamp.
    #[arg(long, value_name = "RFC3339")]
    pub from_date: Option<DateTime<Utc>>,

    #[arg(long)]
    pub person: bool,

    #[arg(long)]
    pub firm: bool,

    #[arg(long)]
    pub deputy: bool,

    #[arg(long)]
    pub draft_application: bool,
}

impl IndexArgs {
    /// Selected entities; none selected means all of them.
    pub fn entities(&self) -> Vec<EntityKind> {
        let selected: Vec<EntityKind> = [
            (self.person, EntityKind::Person),
            (self.firm, EntityKind::Firm),
            (self.deputy, EntityKind::Deputy),
            (self.draft_application, EntityKind::DraftApplication),
        ]
        .into_iter()
        .filter_map(|(chosen, kind)| chosen.then_some(kind))
        .collect();

        if selected.is_empty() {
            EntityKind::ALL.to_vec()
        } else {
            selected
        }
    }

    /// A date wins over `--all`, which wins over the id range.
    pub fn mode(&self) -> IndexMode {
        match (self.from_date, self.all) {
            (Some(from), _) => IndexMode::FromDate(from),
            (None, true) => IndexMode::All,
            (None, false) => IndexMode::ById {
                from: self.from,
                to: self.to,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn index_args(args: &[&str]) -> IndexArgs {
        let cli = Cli::try_parse_from(["search-indexer", "index"].iter().chain(args)).unwrap();
        match cli.command {
            Command::Index(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_index_defaults() {
        let args = index_args(&[]);

        assert_eq!(args.batch_size, 10000);
        assert_eq!(args.mode(), IndexMode::ById { from: 0, to: 100 });
        assert_eq!(args.entities(), EntityKind::ALL.to_vec());
    }

    #[test]
    fn test_index_mode_precedence() {
        let args = index_args(&["--all", "--from-date", "2024-03-01T00:00:00Z", "--firm"]);

        assert_eq!(
            args.mode(),
            IndexMode::FromDate(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(args.entities(), vec![EntityKind::Firm]);
        assert_eq!(index_args(&["--all"]).mode(), IndexMode::All);
    }

    #[test]
    fn test_index_rejects_bad_input() {
        assert!(Cli::try_parse_from(["search-indexer", "index", "--from-date", "yesterday"]).is_err());
        assert!(Cli::try_parse_from(["search-indexer", "index", "--batch-size", "0"]).is_err());
    }

    #[test]
    fn test_update_alias_flags() {
        let cli = Cli::try_parse_from([
            "search-indexer",
            "update-alias",
            "--explain",
            "--set",
            "person_0a1b2c3d4e5f6a7b",
        ])
        .unwrap();

        match cli.command {
            Command::UpdateAlias { explain, set } => {
                assert!(explain);
                assert_eq!(set.as_deref(), Some("person_0a1b2c3d4e5f6a7b"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
