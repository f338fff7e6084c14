use super::styles::{HEADER, LABEL, TIME, TITLE};
use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;
use ruled::{print_row, render_row, Layout, Rule, Table};
use shelf::api::{CmdMessage, MessageLevel};
use shelf::commands::attach::Status;
use shelf::commands::show::{Details, Listing};
use shelf::config::ConfigKey;
use shelf::error::{Result, ShelfError};
use std::io::Write;
use timeago::Formatter;
use unicode_width::UnicodeWidthStr;

/// Gap between a details label and its value.
const LABEL_GAP: usize = 2;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

fn layout(width: usize, columns: Vec<f32>) -> Result<Layout> {
    Layout::new(width, columns).map_err(|e| ShelfError::Store(e.to_string()))
}

/// Two columns: labels, then values starting `LABEL_GAP` past the widest label.
fn label_layout<'a>(labels: impl Iterator<Item = &'a str>, width: usize) -> Result<Layout> {
    let widest = labels.map(|label| label.width()).max().unwrap_or(0);
    let edge = ((widest + LABEL_GAP) as f32 / width.max(1) as f32).min(1.0);
    layout(width, vec![edge])
}

fn listing_table(listing: &Listing, width: usize) -> Result<Table> {
    Ok(Table::new(layout(width, listing.columns.clone())?)
        .header(&listing.headers)
        .header_style((*HEADER).clone()))
}

pub(super) fn print_listing(listing: &Listing, width: usize) -> Result<()> {
    if listing.is_empty() {
        println!("No {} found.", plural(listing.kind));
        return Ok(());
    }
    listing_table(listing, width)?
        .print(listing.rows.iter().cloned())
        .map_err(ShelfError::Io)
}

pub(super) fn render_details(details: &Details, width: usize) -> Result<String> {
    let mut rows: Vec<(&str, String)> = details
        .fields
        .iter()
        .map(|(name, value)| (*name, value.clone()))
        .collect();
    rows.push(("added", format_time_ago(details.created_at)));
    rows.push(("updated", format_time_ago(details.updated_at)));

    let layout = label_layout(rows.iter().map(|(name, _)| *name), width)?;

    let mut out = format!(
        "{}\n",
        TITLE.apply_to(format!("{} {}: {}", details.kind, details.id, details.label))
    );
    for (name, value) in rows {
        let line = render_row(&[name, value.as_str()], Rule::None, &layout);
        let (label, rest) = line.trim_end_matches('\n').split_at(name.len());
        let rest = match name {
            "added" | "updated" => TIME.apply_to(rest).to_string(),
            _ => rest.to_string(),
        };
        out.push_str(&format!("{}{}\n", LABEL.apply_to(label), rest));
    }
    Ok(out)
}

pub(super) fn write_status<W: Write>(out: &mut W, status: &Status, width: usize) -> Result<()> {
    let title = format!("{} ({})", status.label, status.subject);
    let line = render_row(
        &[title, status.reading.to_string()],
        Rule::None,
        &layout(width, vec![0.7])?,
    );
    writeln!(out, "{}", TITLE.apply_to(line.trim_end())).map_err(ShelfError::Io)?;
    let columns = [0.12, 0.4, 1.0];

    if !status.acquisitions.is_empty() {
        let rows = status.acquisitions.iter().map(|acq| {
            vec![
                acq.meta.id.to_string(),
                date(acq.date),
                acq.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            ]
        });
        writeln!(out).map_err(ShelfError::Io)?;
        section(&["Acquisition", "Date", "Price"], &columns, width)?
            .write(&mut *out, rows)
            .map_err(ShelfError::Io)?;
    }
    if !status.reads.is_empty() {
        let rows = status
            .reads
            .iter()
            .map(|read| vec![read.meta.id.to_string(), date(read.started), date(read.finished)]);
        writeln!(out).map_err(ShelfError::Io)?;
        section(&["Read", "Started", "Finished"], &columns, width)?
            .write(&mut *out, rows)
            .map_err(ShelfError::Io)?;
    }
    if !status.files.is_empty() {
        let rows = status
            .files
            .iter()
            .map(|file| vec![file.meta.id.to_string(), file.name.clone(), file.blob.clone()]);
        writeln!(out).map_err(ShelfError::Io)?;
        section(&["File", "Name", "Stored as"], &columns, width)?
            .write(&mut *out, rows)
            .map_err(ShelfError::Io)?;
    }
    Ok(())
}

fn section(headers: &[&str], columns: &[f32], width: usize) -> Result<Table> {
    Ok(Table::new(layout(width, columns.to_vec())?)
        .header(headers)
        .header_style((*HEADER).clone()))
}

fn config_layout(values: &[(ConfigKey, Option<String>)], width: usize) -> Result<Layout> {
    label_layout(values.iter().map(|(key, _)| key.name()), width)
}

pub(super) fn print_config(values: &[(ConfigKey, Option<String>)], width: usize) -> Result<()> {
    let layout = config_layout(values, width)?;
    for (key, value) in values {
        let value = value.as_deref().unwrap_or("(unset)");
        print_row(&[key.name(), value], Rule::None, &layout).map_err(ShelfError::Io)?;
    }
    Ok(())
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn plural(kind: &str) -> String {
    match kind {
        "series" => kind.to_string(),
        "person" => "people".to_string(),
        _ => format!("{}s", kind),
    }
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let ago = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{} ({})", ago, timestamp.format("%Y-%m-%d %H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        console::set_colors_enabled(false);
    }

    #[test]
    fn kinds_pluralize() {
        assert_eq!(plural("person"), "people");
        assert_eq!(plural("series"), "series");
        assert_eq!(plural("genre"), "genres");
    }

    #[test]
    fn listing_renders_header_and_rules() {
        plain();
        let listing = Listing {
            kind: "genre",
            headers: vec!["#", "name"],
            columns: vec![0.2, 1.0],
            rows: vec![
                vec!["1".into(), "Poetry".into()],
                vec!["2".into(), "Science Fiction".into()],
            ],
        };
        let out = listing_table(&listing, 20)
            .unwrap()
            .render(listing.rows.iter().cloned());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "#   name");
        assert_eq!(lines[1], "=".repeat(20));
        assert_eq!(lines[2], "1   Poetry");
        assert_eq!(lines[3], "-".repeat(20));
        assert_eq!(lines[4], "2   Science Fiction");
        assert_eq!(lines[5], "=".repeat(20));
    }

    #[test]
    fn details_align_values() {
        plain();
        let details = Details {
            kind: "book",
            id: 3,
            label: "Mort".into(),
            fields: vec![("title", "Mort".into()), ("series", "Discworld".into())],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let out = render_details(&details, 40).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "book 3: Mort");
        assert!(lines[1].starts_with("title"));
        assert_eq!(lines[1].find("Mort"), lines[2].find("Discworld"));
        assert!(lines[3].starts_with("added"));
    }

    #[test]
    fn config_values_line_up() {
        let values = vec![
            (ConfigKey::LineWidth, Some("90".to_string())),
            (ConfigKey::MediaDir, None),
        ];
        let layout = config_layout(&values, 90).unwrap();
        assert_eq!(
            render_row(&["line-width", "90"], Rule::None, &layout),
            "line-width  90\n"
        );
        assert_eq!(
            render_row(&["media-dir", "(unset)"], Rule::None, &layout),
            "media-dir   (unset)\n"
        );
    }

    #[test]
    fn status_sections_are_ruled_tables() {
        use shelf::model::{Acquisition, BookId, Meta, ReadingStatus, Subject};
        plain();
        let subject = Subject::Book(BookId(1));
        let status = Status {
            subject,
            label: "Solaris".into(),
            reading: ReadingStatus::Unread,
            acquisitions: vec![Acquisition {
                meta: Meta::new(),
                subject,
                date: NaiveDate::from_ymd_opt(2023, 12, 24),
                price: Some(14.95),
            }],
            reads: Vec::new(),
            files: Vec::new(),
        };
        let mut buf = Vec::new();
        write_status(&mut buf, &status, 50).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Solaris (book:1)"));
        assert!(lines[0].ends_with("unread"));
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("Acquisition"));
        assert_eq!(lines[3], "=".repeat(50));
        assert!(lines[4].contains("2023-12-24"));
        assert!(lines[4].ends_with("14.95"));
        assert_eq!(lines[5], "=".repeat(50));
        assert!(!out.contains("Started"));
    }
}
