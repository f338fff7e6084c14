use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "shelf", bin_name = "shelf", version = get_version())]
#[command(about = "Catalogue of books, magazines and papers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Genres
    #[command(display_order = 1)]
    Genre {
        #[command(subcommand)]
        action: NamedAction,
    },

    /// Languages
    #[command(display_order = 2)]
    Language {
        #[command(subcommand)]
        action: LanguageAction,
    },

    /// Publishers
    #[command(display_order = 3)]
    Publisher {
        #[command(subcommand)]
        action: NamedAction,
    },

    /// Book series
    #[command(display_order = 4)]
    Series {
        #[command(subcommand)]
        action: NamedAction,
    },

    /// Journals
    #[command(display_order = 5)]
    Journal {
        #[command(subcommand)]
        action: NamedAction,
    },

    /// Magazines
    #[command(display_order = 6)]
    Magazine {
        #[command(subcommand)]
        action: MagazineAction,
    },

    /// Magazine issues
    #[command(display_order = 7)]
    Issue {
        #[command(subcommand)]
        action: IssueAction,
    },

    /// Authors
    #[command(alias = "author", display_order = 8)]
    Person {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Books
    #[command(display_order = 9)]
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Editions of a book
    #[command(display_order = 10)]
    Edition {
        #[command(subcommand)]
        action: EditionAction,
    },

    /// Papers
    #[command(display_order = 11)]
    Paper {
        #[command(subcommand)]
        action: PaperAction,
    },

    /// Links
    #[command(display_order = 12)]
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Acquisitions of a book, edition, issue, magazine or paper
    #[command(display_order = 20)]
    Acquisition {
        #[command(subcommand)]
        action: AcquisitionAction,
    },

    /// Reads of a book, edition, issue, magazine or paper
    #[command(display_order = 21)]
    Read {
        #[command(subcommand)]
        action: ReadAction,
    },

    /// Files attached to a book, edition, issue, magazine or paper
    #[command(display_order = 22)]
    File {
        #[command(subcommand)]
        action: FileAction,
    },

    /// Reading status and attachments of a subject (e.g. book:dune)
    #[command(display_order = 30)]
    Status { subject: String },

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (line-width, media-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Actions every entity supports.
#[derive(Subcommand, Debug)]
pub enum CommonAction {
    /// Change one field (an empty value clears it)
    #[command(alias = "e", display_order = 2)]
    Edit {
        /// Id, slug or part of the name
        term: String,
        field: String,
        #[arg(default_value = "")]
        value: String,
    },

    /// Show one record
    #[command(alias = "v", display_order = 3)]
    Info { term: String },

    /// List records
    #[command(alias = "ls", display_order = 4)]
    List {
        /// Search term
        search: Option<String>,
    },

    /// Delete a record
    #[command(alias = "rm", display_order = 5)]
    Delete { term: String },
}

#[derive(Args, Debug, Default)]
pub struct LinkArgs {
    /// Link url (repeatable)
    #[arg(long = "link")]
    pub links: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct LanguageArgs {
    /// Language name (repeatable)
    #[arg(long = "language")]
    pub languages: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum NamedAction {
    /// Add by name, or report the existing one
    #[command(alias = "n", display_order = 1)]
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum LanguageAction {
    /// Add a language
    #[command(alias = "n", display_order = 1)]
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Language code (e.g. en)
        #[arg(long)]
        code: Option<String>,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum MagazineAction {
    /// Add a magazine
    #[command(alias = "n", display_order = 1)]
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Feed url
        #[arg(long)]
        feed: Option<String>,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum IssueAction {
    /// Add an issue of a magazine
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Magazine id or name
        magazine: String,

        /// Issue label (e.g. 2024/03)
        issue: String,

        /// Publishing date (YYYY-MM-DD)
        #[arg(long)]
        published: Option<String>,

        /// Cover image file, copied into the media directory
        #[arg(long)]
        cover: Option<PathBuf>,

        #[command(flatten)]
        languages: LanguageArgs,

        #[command(flatten)]
        links: LinkArgs,
    },

    /// Set the cover image of an issue, or clear it when no file is given
    #[command(display_order = 6)]
    Cover { term: String, path: Option<PathBuf> },

    /// Print the path of the stored cover image
    #[command(display_order = 7)]
    CoverPath { term: String },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum PersonAction {
    /// Add a person
    #[command(alias = "n", display_order = 1)]
    Add {
        first_name: String,
        last_name: Option<String>,

        #[command(flatten)]
        links: LinkArgs,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum BookAction {
    /// Add a book
    #[command(alias = "n", display_order = 1)]
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Author name (repeatable, "First Last")
        #[arg(long = "author")]
        authors: Vec<String>,

        #[arg(long)]
        series: Option<String>,

        /// Volume within the series
        #[arg(long)]
        volume: Option<String>,

        /// Genre name (repeatable)
        #[arg(long = "genre")]
        genres: Vec<String>,

        #[command(flatten)]
        links: LinkArgs,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum EditionAction {
    /// Add an edition of a book
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Book id or title
        book: String,

        #[arg(long)]
        alternate_title: Option<String>,

        #[arg(long)]
        isbn: Option<String>,

        /// Publishing date (YYYY-MM-DD)
        #[arg(long)]
        published: Option<String>,

        #[arg(long)]
        publisher: Option<String>,

        /// Binding (e.g. paperback)
        #[arg(long)]
        binding: Option<String>,

        #[command(flatten)]
        languages: LanguageArgs,

        #[command(flatten)]
        links: LinkArgs,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum PaperAction {
    /// Add a paper
    #[command(alias = "n", display_order = 1)]
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Author name (repeatable, "First Last")
        #[arg(long = "author")]
        authors: Vec<String>,

        #[arg(long)]
        journal: Option<String>,

        #[arg(long)]
        volume: Option<String>,

        /// Publishing date (YYYY-MM-DD)
        #[arg(long)]
        published: Option<String>,

        #[command(flatten)]
        languages: LanguageArgs,

        #[command(flatten)]
        links: LinkArgs,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum LinkAction {
    /// Add a link
    #[command(alias = "n", display_order = 1)]
    Add { url: String },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum AcquisitionAction {
    /// Record an acquisition
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Subject, e.g. edition:3 or book:dune
        subject: String,

        /// Acquisition date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        date: String,

        #[arg(long, default_value = "")]
        price: String,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum ReadAction {
    /// Record a read
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Subject, e.g. edition:3 or book:dune
        subject: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        started: String,

        /// End date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        finished: String,
    },

    #[command(flatten)]
    Common(CommonAction),
}

#[derive(Subcommand, Debug)]
pub enum FileAction {
    /// Attach a file
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Subject, e.g. edition:3 or book:dune
        subject: String,
        path: PathBuf,
    },

    /// Show one file
    #[command(alias = "v", display_order = 2)]
    Info { term: String },

    /// List files
    #[command(alias = "ls", display_order = 3)]
    List { search: Option<String> },

    /// Print the path of the stored file
    #[command(display_order = 4)]
    Path { term: String },

    /// Write the file's bytes to stdout
    #[command(display_order = 5)]
    Cat { term: String },

    /// Delete a file and its stored bytes
    #[command(alias = "rm", display_order = 6)]
    Delete { term: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn book_add_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "shelf", "book", "add", "The", "Left", "Hand", "--author", "Ursula K. Le Guin",
            "--genre", "Science Fiction", "--genre", "Classic",
        ])
        .unwrap();
        match cli.command {
            Commands::Book {
                action: BookAction::Add { title, authors, genres, .. },
            } => {
                assert_eq!(title.join(" "), "The Left Hand");
                assert_eq!(authors, vec!["Ursula K. Le Guin"]);
                assert_eq!(genres.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn common_actions_are_flattened() {
        let cli = Cli::try_parse_from(["shelf", "genre", "edit", "1", "name"]).unwrap();
        match cli.command {
            Commands::Genre {
                action: NamedAction::Common(CommonAction::Edit { term, field, value }),
            } => {
                assert_eq!(term, "1");
                assert_eq!(field, "name");
                assert_eq!(value, "");
            }
            other => panic!("unexpected {:?}", other),
        }

        let cli = Cli::try_parse_from(["shelf", "issue", "cover", "2024-03"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Issue {
                action: IssueAction::Cover { path: None, .. }
            }
        ));

        let cli = Cli::try_parse_from(["shelf", "-v", "read", "ls"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Read {
                action: ReadAction::Common(CommonAction::List { search: None })
            }
        ));
    }
}
