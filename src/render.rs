//! Table, JSON and Markdown emitters for repository records
//!
//! Every renderer works from the same column list; a column is emitted only
//! when the data behind it was requested, so an unset field is never shown as
//! a negative status.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::io::{self, Write};

use crate::core::{NameShown, RepositoryRecord, StatusConfig};
use crate::git::SyncStatus;
use crate::utils::hyperlink;

pub const AHEAD_BEHIND_SYMBOL: &str = "⇅";
pub const DIRTY_SYMBOL: &str = "⊛";
pub const UNTRACKED_SYMBOL: &str = "⊗";
pub const STASH_SYMBOL: &str = "⊜";
pub const FETCH_NEEDED_SYMBOL: &str = "↯";

/// Blank columns to the right of every table cell
const COLUMN_GAP: u16 = 2;
const MARKDOWN_RESERVED: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '(', ')', '#', '.', '!', '+', '-',
];

/// Returns `label` for a set flag and an empty string otherwise
pub fn bool_label(flag: Option<bool>, label: &str) -> String {
    match flag {
        Some(true) => label.to_string(),
        _ => String::new(),
    }
}

/// Prefixes every Markdown-reserved character with one backslash
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn markdown_alignment(alignment: CellAlignment) -> &'static str {
    match alignment {
        CellAlignment::Left => ":-",
        CellAlignment::Center => ":-:",
        CellAlignment::Right => "-:",
    }
}

/// One output column, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Name,
    LastCommit,
    BranchHead,
    FetchNeeded,
    BranchUpstream,
    Url,
    AheadBehind,
    Dirty,
    Untracked,
    Stash,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Name,
        Column::LastCommit,
        Column::BranchHead,
        Column::FetchNeeded,
        Column::BranchUpstream,
        Column::Url,
        Column::AheadBehind,
        Column::Dirty,
        Column::Untracked,
        Column::Stash,
    ];

    /// Columns shown for `config`, in display order
    pub fn shown(config: &StatusConfig) -> Vec<Column> {
        Self::ALL
            .into_iter()
            .filter(|column| column.is_shown(config))
            .collect()
    }

    pub fn is_shown(self, config: &StatusConfig) -> bool {
        match self {
            Column::Name | Column::AheadBehind => true,
            Column::LastCommit => config.show_commit_time,
            Column::BranchHead => config.show_branch_head,
            Column::FetchNeeded => config.show_fetch_needed,
            Column::BranchUpstream => config.show_branch_upstream,
            Column::Url => config.show_url,
            Column::Dirty => config.show_dirty,
            Column::Untracked => config.show_untracked,
            Column::Stash => config.show_stash,
        }
    }

    pub fn title(self, config: &StatusConfig) -> &'static str {
        match self {
            Column::Name => match config.name_shown {
                NameShown::Path => "Top-level path",
                NameShown::Short => "Short",
                NameShown::Unique => "Unique name",
            },
            Column::LastCommit => "Last commit",
            Column::BranchHead => "Branch head",
            Column::FetchNeeded => "Q",
            Column::BranchUpstream => "Branch remote",
            Column::Url => "Url",
            Column::AheadBehind => AHEAD_BEHIND_SYMBOL,
            Column::Dirty => "D",
            Column::Untracked => "U",
            Column::Stash => "S",
        }
    }

    /// Cell text without styling or links
    pub fn text(self, config: &StatusConfig, record: &RepositoryRecord) -> String {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        match self {
            Column::Name => match config.name_shown {
                NameShown::Path => record.top_level_path.display().to_string(),
                NameShown::Short => record.short_name.clone(),
                NameShown::Unique => record.unique_name.clone(),
            },
            Column::LastCommit => optional(&record.last_commit_time),
            Column::BranchHead => optional(&record.branch_head),
            Column::FetchNeeded => bool_label(record.fetch_needed, FETCH_NEEDED_SYMBOL),
            Column::BranchUpstream => optional(&record.branch_upstream),
            Column::Url => optional(&record.origin_url),
            Column::AheadBehind => record
                .status_class
                .map(|status| status.symbol().to_string())
                .unwrap_or_default(),
            Column::Dirty => bool_label(record.dirty, DIRTY_SYMBOL),
            Column::Untracked => bool_label(record.untracked, UNTRACKED_SYMBOL),
            Column::Stash => bool_label(record.stash, STASH_SYMBOL),
        }
    }

    /// Target of the terminal hyperlink wrapped around the cell, if any
    fn link(self, record: &RepositoryRecord) -> Option<String> {
        match self {
            Column::Name => Some(format!("file://{}", record.top_level_path.display())),
            Column::Url => record
                .origin_url
                .as_deref()
                .map(|url| url.replace("ssh://git@", "https://")),
            _ => None,
        }
    }

    fn color(self, record: &RepositoryRecord) -> Option<Color> {
        let color = match self {
            Column::Name => Color::Yellow,
            Column::LastCommit => Color::DarkGrey,
            Column::BranchHead | Column::BranchUpstream => Color::Blue,
            Column::FetchNeeded => Color::Cyan,
            Column::Url => Color::Grey,
            Column::AheadBehind => match record.status_class? {
                SyncStatus::Synced => Color::Green,
                SyncStatus::RemoteAhead => Color::Cyan,
                SyncStatus::LocalAhead => Color::Magenta,
                SyncStatus::Diverged => Color::Red,
            },
            Column::Dirty => Color::DarkCyan,
            Column::Untracked => Color::DarkRed,
            Column::Stash => Color::DarkYellow,
        };
        Some(color)
    }

    fn alignment(self) -> CellAlignment {
        match self {
            Column::Name
            | Column::LastCommit
            | Column::BranchHead
            | Column::BranchUpstream
            | Column::Url => CellAlignment::Left,
            _ => CellAlignment::Center,
        }
    }

    /// Symbol and URL cells are written verbatim in Markdown
    fn escapes_markdown(self) -> bool {
        matches!(
            self,
            Column::Name | Column::LastCommit | Column::BranchHead | Column::BranchUpstream
        )
    }
}

/// Pretty-printed JSON array of all records
pub fn emit_json<W: Write>(out: &mut W, records: &[RepositoryRecord]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)?;
    log::info!("{} records marshalled", records.len());
    Ok(())
}

fn markdown_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Markdown table with an alignment row
pub fn emit_markdown<W: Write>(
    out: &mut W,
    records: &[RepositoryRecord],
    config: &StatusConfig,
) -> io::Result<()> {
    let columns = Column::shown(config);

    let header: Vec<String> = columns.iter().map(|c| c.title(config).to_string()).collect();
    writeln!(out, "{}", markdown_row(&header))?;

    let separator: Vec<String> = columns
        .iter()
        .map(|c| markdown_alignment(c.alignment()).to_string())
        .collect();
    writeln!(out, "{}", markdown_row(&separator))?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| {
                let text = column.text(config, record);
                if column.escapes_markdown() {
                    escape_markdown(&text)
                } else {
                    text
                }
            })
            .collect();
        writeln!(out, "{}", markdown_row(&row))?;
    }

    log::info!("{} rows printed", records.len());
    Ok(())
}

/// Aligned, optionally colored table
///
/// Layout is done on the plain cell text. Hyperlinks are spliced into the
/// rendered lines afterwards so their escape sequences never count towards
/// column widths.
pub fn emit_table<W: Write>(
    out: &mut W,
    records: &[RepositoryRecord],
    config: &StatusConfig,
    styled: bool,
) -> io::Result<()> {
    let columns = Column::shown(config);

    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled);
    if styled {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    table.set_header(columns.iter().map(|column| {
        let cell = Cell::new(column.title(config));
        if styled {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }));

    for record in records {
        table.add_row(columns.iter().map(|column| {
            let cell = Cell::new(column.text(config, record));
            match column.color(record) {
                Some(color) if styled => cell.fg(color),
                _ => cell,
            }
        }));
        log::trace!("row [{}] appended", record.short_name);
    }

    for (index, column) in columns.iter().enumerate() {
        if let Some(table_column) = table.column_mut(index) {
            table_column.set_padding((0, COLUMN_GAP));
            table_column.set_cell_alignment(column.alignment());
        }
    }

    let starts = column_starts(&table.column_max_content_widths());
    let mut lines = table.lines();
    if let Some(header) = lines.next() {
        writeln!(out, "{}", header.trim_end())?;
    }
    for (record, line) in records.iter().zip(lines) {
        let line = if styled {
            link_cells(line, &columns, &starts, config, record)
        } else {
            line
        };
        writeln!(out, "{}", line.trim_end())?;
    }

    log::info!("{} rows appended", records.len());
    Ok(())
}

/// Display column at which each table column begins
fn column_starts(widths: &[u16]) -> Vec<usize> {
    widths
        .iter()
        .scan(0, |start, width| {
            let current = *start;
            *start += usize::from(*width) + usize::from(COLUMN_GAP);
            Some(current)
        })
        .collect()
}

/// Wraps the name and URL cells of a rendered row in terminal hyperlinks
///
/// Linked columns are left aligned, so their text begins at the column start.
fn link_cells(
    mut line: String,
    columns: &[Column],
    starts: &[usize],
    config: &StatusConfig,
    record: &RepositoryRecord,
) -> String {
    // Right to left, so earlier byte offsets stay valid
    for (column, start) in columns.iter().zip(starts).rev() {
        let Some(target) = column.link(record) else {
            continue;
        };
        let width = console::measure_text_width(&column.text(config, record));
        if width == 0 {
            continue;
        }
        if let Some((open, close)) = visible_range(&line, *start, width) {
            line = format!(
                "{}{}{}",
                &line[..open],
                hyperlink(&target, &line[open..close]),
                &line[close..]
            );
        }
    }
    line
}

/// Byte range covering `width` display columns from column `start`, skipping
/// CSI escape sequences
fn visible_range(line: &str, start: usize, width: usize) -> Option<(usize, usize)> {
    let mut chars = line.char_indices();
    let mut column = 0;
    let mut open = None;
    let mut buf = [0; 4];

    while let Some((index, c)) = chars.next() {
        if c == '\x1b' {
            // ESC '[' parameters... final byte
            chars.next();
            for (_, next) in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
            continue;
        }
        if column == start && open.is_none() {
            open = Some(index);
        }
        column += console::measure_text_width(c.encode_utf8(&mut buf));
        if open.is_some() && column >= start + width {
            return open.map(|open| (open, index + c.len_utf8()));
        }
    }
    None
}
