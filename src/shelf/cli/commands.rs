//! Dispatch from parsed arguments to the API, and from API results to the
//! terminal.
//!
//! - `run()`: main dispatch logic (called by `main.rs`)
//! - `init_context()`: builds `AppContext` with the API and the line width
//! - `handle_*()`: per-command handlers that call the API and print

use super::print::{print_config, print_listing, print_messages, render_details, write_status};
use super::setup::{
    AcquisitionAction, BookAction, Cli, Commands, CommonAction, EditionAction, FileAction,
    IssueAction, LanguageAction, LinkAction, MagazineAction, NamedAction, PaperAction,
    PersonAction, ReadAction,
};
use clap::Parser;
use directories::ProjectDirs;
use shelf::api::{CmdMessage, ConfigAction, ShelfApi, ShelfPaths};
use shelf::commands::create::{NewBook, NewEdition, NewIssue, NewPaper, NewPerson};
use shelf::commands::delete::Cascade;
use shelf::commands::edit::Editable;
use shelf::commands::show::Describe;
use shelf::error::{Result, ShelfError};
use shelf::model::*;
use shelf::store::fs::FileStore;
use shelf::store::{Created, Record};
use std::io::Write;
use std::path::PathBuf;

const HOME_ENV: &str = "SHELF_HOME";

struct AppContext {
    api: ShelfApi<FileStore>,
    width: usize,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context()?;

    match cli.command {
        Commands::Genre { action } => handle_named::<Genre>(&mut ctx, action),
        Commands::Publisher { action } => handle_named::<Publisher>(&mut ctx, action),
        Commands::Series { action } => handle_named::<Series>(&mut ctx, action),
        Commands::Journal { action } => handle_named::<Journal>(&mut ctx, action),
        Commands::Language { action } => match action {
            LanguageAction::Add { name, code } => {
                let created = ctx.api.create_language(&name.join(" "), code.as_deref())?;
                print_created(&created);
                Ok(())
            }
            LanguageAction::Common(action) => handle_common::<Language>(&mut ctx, action),
        },
        Commands::Magazine { action } => match action {
            MagazineAction::Add { name, feed } => {
                let created = ctx.api.create_magazine(&name.join(" "), feed.as_deref())?;
                print_created(&created);
                Ok(())
            }
            MagazineAction::Common(action) => handle_common::<Magazine>(&mut ctx, action),
        },
        Commands::Issue { action } => match action {
            IssueAction::Add {
                magazine,
                issue,
                published,
                cover,
                languages,
                links,
            } => {
                let created = ctx.api.create_issue(NewIssue {
                    magazine,
                    issue,
                    publishing_date: published,
                    cover,
                    languages: languages.languages,
                    links: links.links,
                })?;
                print_created(&created);
                Ok(())
            }
            IssueAction::Cover { term, path } => {
                let result = ctx.api.set_cover(&term, path.as_deref())?;
                print_messages(&result.messages);
                Ok(())
            }
            IssueAction::CoverPath { term } => {
                println!("{}", ctx.api.cover_path(&term)?.display());
                Ok(())
            }
            IssueAction::Common(action) => handle_common::<Issue>(&mut ctx, action),
        },
        Commands::Person { action } => match action {
            PersonAction::Add {
                first_name,
                last_name,
                links,
            } => {
                let created = ctx.api.create_person(NewPerson {
                    first_name,
                    last_name,
                    links: links.links,
                })?;
                print_created(&created);
                Ok(())
            }
            PersonAction::Common(action) => handle_common::<Person>(&mut ctx, action),
        },
        Commands::Book { action } => match action {
            BookAction::Add {
                title,
                authors,
                series,
                volume,
                genres,
                links,
            } => {
                let created = ctx.api.create_book(NewBook {
                    title: title.join(" "),
                    authors,
                    series,
                    volume,
                    genres,
                    links: links.links,
                })?;
                print_created(&created);
                Ok(())
            }
            BookAction::Common(action) => handle_common::<Book>(&mut ctx, action),
        },
        Commands::Edition { action } => match action {
            EditionAction::Add {
                book,
                alternate_title,
                isbn,
                published,
                publisher,
                binding,
                languages,
                links,
            } => {
                let created = ctx.api.create_edition(NewEdition {
                    book,
                    alternate_title,
                    isbn,
                    publishing_date: published,
                    publisher,
                    binding,
                    languages: languages.languages,
                    links: links.links,
                })?;
                print_created(&created);
                Ok(())
            }
            EditionAction::Common(action) => handle_common::<Edition>(&mut ctx, action),
        },
        Commands::Paper { action } => match action {
            PaperAction::Add {
                title,
                authors,
                journal,
                volume,
                published,
                languages,
                links,
            } => {
                let created = ctx.api.create_paper(NewPaper {
                    title: title.join(" "),
                    authors,
                    journal,
                    volume,
                    publishing_date: published,
                    languages: languages.languages,
                    links: links.links,
                })?;
                print_created(&created);
                Ok(())
            }
            PaperAction::Common(action) => handle_common::<Paper>(&mut ctx, action),
        },
        Commands::Link { action } => match action {
            LinkAction::Add { url } => {
                let created = ctx.api.create_link(&url)?;
                print_created(&created);
                Ok(())
            }
            LinkAction::Common(action) => handle_common::<Link>(&mut ctx, action),
        },
        Commands::Acquisition { action } => match action {
            AcquisitionAction::Add {
                subject,
                date,
                price,
            } => {
                let acq = ctx.api.add_acquisition(&subject, &date, &price)?;
                print_messages(&[CmdMessage::success(format!(
                    "Added acquisition {} of {}",
                    acq.meta.id, acq.subject
                ))]);
                Ok(())
            }
            AcquisitionAction::Common(action) => handle_common::<Acquisition>(&mut ctx, action),
        },
        Commands::Read { action } => match action {
            ReadAction::Add {
                subject,
                started,
                finished,
            } => {
                let read = ctx.api.add_read(&subject, &started, &finished)?;
                print_messages(&[CmdMessage::success(format!(
                    "Added read {} of {}",
                    read.meta.id, read.subject
                ))]);
                Ok(())
            }
            ReadAction::Common(action) => handle_common::<Read>(&mut ctx, action),
        },
        Commands::File { action } => handle_file(&mut ctx, action),
        Commands::Status { subject } => {
            let status = ctx.api.status(&subject)?;
            let stdout = std::io::stdout();
            write_status(&mut stdout.lock(), &status, ctx.width)?;
            Ok(())
        }
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "shelf", "shelf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ShelfError::Config(format!(
                "could not determine a data directory, set {}",
                HOME_ENV
            ))
        })
}

fn init_context() -> Result<AppContext> {
    let paths = ShelfPaths { data: data_dir()? };
    let config = paths.config()?;
    let store =
        FileStore::new(paths.data.clone()).with_media_dir(config.media_dir_in(&paths.data));
    let width = config.line_width.unwrap_or_else(ruled::terminal_width);

    Ok(AppContext {
        api: ShelfApi::new(store, paths),
        width,
    })
}

fn print_created<R: Record>(created: &Created<R>) {
    let record = created.get();
    let message = match created {
        Created::New(_) => CmdMessage::success(format!("Created {} {}", R::KIND, record.id())),
        Created::Existing(_) => {
            CmdMessage::info(format!("{} {} already exists", R::KIND, record.id()))
        }
    };
    print_messages(&[message]);
}

fn handle_named<R: Named + Editable + Cascade + Describe>(
    ctx: &mut AppContext,
    action: NamedAction,
) -> Result<()> {
    match action {
        NamedAction::Add { name } => {
            let created = ctx.api.create_named::<R>(&name.join(" "))?;
            print_created(&created);
            Ok(())
        }
        NamedAction::Common(action) => handle_common::<R>(ctx, action),
    }
}

fn handle_common<R: Editable + Cascade + Describe>(
    ctx: &mut AppContext,
    action: CommonAction,
) -> Result<()> {
    match action {
        CommonAction::Edit { term, field, value } => {
            let result = ctx.api.edit::<R>(&term, &field, &value)?;
            print_messages(&result.messages);
        }
        CommonAction::Info { term } => {
            let details = ctx.api.info::<R>(&term)?;
            print!("{}", render_details(&details, ctx.width)?);
        }
        CommonAction::List { search } => {
            let listing = ctx.api.list::<R>(search.as_deref())?;
            print_listing(&listing, ctx.width)?;
        }
        CommonAction::Delete { term } => {
            let result = ctx.api.delete::<R>(&term)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_file(ctx: &mut AppContext, action: FileAction) -> Result<()> {
    match action {
        FileAction::Add { subject, path } => {
            let file = ctx.api.attach_file(&subject, &path)?;
            print_messages(&[CmdMessage::success(format!(
                "Attached {} to {} as file {}",
                file.name, file.subject, file.meta.id
            ))]);
        }
        FileAction::Info { term } => {
            let details = ctx.api.info::<File>(&term)?;
            print!("{}", render_details(&details, ctx.width)?);
        }
        FileAction::List { search } => {
            let listing = ctx.api.list::<File>(search.as_deref())?;
            print_listing(&listing, ctx.width)?;
        }
        FileAction::Path { term } => {
            println!("{}", ctx.api.file_path(&term)?.display());
        }
        FileAction::Cat { term } => {
            let (_, bytes) = ctx.api.open_file(&term)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&bytes).map_err(ShelfError::Io)?;
            handle.flush().map_err(ShelfError::Io)?;
        }
        FileAction::Delete { term } => {
            let result = ctx.api.delete::<File>(&term)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::Show(key.parse()?),
        (Some(key), Some(value)) => ConfigAction::Set(key.parse()?, value),
    };
    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        print_config(&result.value, ctx.width)?;
    } else {
        print_messages(&result.messages);
    }
    Ok(())
}
