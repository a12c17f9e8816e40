//! GFM pipe-table parsing over accumulated paragraph lines.
//!
//! The first line is the header row, the second must be a delimiter row
//! (`:?-+:?` cells), and everything after is body. Cells inherit column
//! alignment from the delimiter row.

use crate::nodes::{SourceLocation, Table, TableAlignment, TableCell, TableRow};
use crate::parser::Parser;

impl<'s, 'o> Parser<'s, 'o> {
    pub(crate) fn try_parse_table(
        &mut self,
        lines: &[String],
        location: SourceLocation,
    ) -> Option<Table> {
        if lines.len() < 2 {
            return None;
        }

        let header_cells = parse_table_row(&lines[0])?;
        let alignments = parse_table_delimiter(&lines[1])?;

        let header_row = TableRow {
            location,
            cells: header_cells
                .iter()
                .enumerate()
                .map(|(i, cell)| TableCell {
                    location,
                    children: self.parse_inline(cell.trim(), location),
                    is_header: true,
                    align: alignments.get(i).copied().unwrap_or(TableAlignment::None),
                })
                .collect(),
            is_header: true,
        };

        let mut body: Vec<TableRow> = Vec::new();
        for line in &lines[2..] {
            if let Some(cells) = parse_table_row(line) {
                body.push(TableRow {
                    location,
                    cells: cells
                        .iter()
                        .enumerate()
                        .map(|(i, cell)| TableCell {
                            location,
                            children: self.parse_inline(cell.trim(), location),
                            is_header: false,
                            align: alignments.get(i).copied().unwrap_or(TableAlignment::None),
                        })
                        .collect(),
                    is_header: false,
                });
            }
        }

        Some(Table {
            location,
            head: vec![header_row],
            body,
            alignments,
        })
    }
}

/// Splits a row into cells on unescaped pipes, after trimming the
/// surrounding pipes.
fn parse_table_row(line: &str) -> Option<Vec<String>> {
    let mut line = line.trim();
    if !line.contains('|') {
        return None;
    }

    line = line.strip_prefix('|').unwrap_or(line);
    line = line.strip_suffix('|').unwrap_or(line);

    let mut cells: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    cells.push(current);

    Some(cells)
}

/// Parses the delimiter row; each cell must be `:?-+:?` with at least one
/// dash. Returns per-column alignments.
fn parse_table_delimiter(line: &str) -> Option<Vec<TableAlignment>> {
    let mut line = line.trim();
    line = line.strip_prefix('|').unwrap_or(line);
    line = line.strip_suffix('|').unwrap_or(line);

    let mut alignments: Vec<TableAlignment> = Vec::new();
    for part in line.split('|') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let left = part.starts_with(':');
        let right = part.ends_with(':');
        let mut inner = part;
        if left {
            inner = &inner[1..];
        }
        if right && !inner.is_empty() {
            inner = &inner[..inner.len() - 1];
        }

        if inner.is_empty() || !inner.bytes().all(|b| b == b'-') {
            return None;
        }

        alignments.push(match (left, right) {
            (true, true) => TableAlignment::Center,
            (true, false) => TableAlignment::Left,
            (false, true) => TableAlignment::Right,
            (false, false) => TableAlignment::None,
        });
    }

    if alignments.is_empty() {
        None
    } else {
        Some(alignments)
    }
}
