// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text table renderer for list views.

use std::io::Write;

/// Column text alignment.
pub enum Align {
    Left,
    Right,
}

/// A column definition in a [`Table`].
pub struct Column {
    pub name: &'static str,
    pub align: Align,
    /// Maximum width (`None` = unlimited). Longer values are truncated.
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self {
            name,
            align: Align::Left,
            max_width: None,
        }
    }

    pub fn right(name: &'static str) -> Self {
        Self {
            name,
            align: Align::Right,
            max_width: None,
        }
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max_width = Some(max);
        self
    }
}

/// A tabular renderer that auto-computes column widths from data.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

/// Column separator: double space.
const SEP: &str = "  ";

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Render header and rows. An empty table renders nothing.
    ///
    /// The last column is never padded when left-aligned.
    pub fn render(&self, out: &mut impl Write) {
        if self.rows.is_empty() {
            return;
        }
        let widths = self.compute_widths();

        let header: Vec<&str> = self.columns.iter().map(|c| c.name).collect();
        let _ = writeln!(out, "{}", self.format_row(&header, &widths));
        for row in &self.rows {
            let cells: Vec<&str> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| truncate(row.get(i).map_or("", String::as_str), col.max_width))
                .collect();
            let _ = writeln!(out, "{}", self.format_row(&cells, &widths));
        }
    }

    fn format_row(&self, cells: &[&str], widths: &[usize]) -> String {
        let last = self.columns.len().saturating_sub(1);
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let cell = cells.get(i).copied().unwrap_or("");
                match col.align {
                    Align::Left if i == last => cell.to_string(),
                    Align::Left => format!("{:<width$}", cell, width = widths[i]),
                    Align::Right => format!("{:>width$}", cell, width = widths[i]),
                }
            })
            .collect::<Vec<_>>()
            .join(SEP)
    }

    fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .map(|row| {
                        let raw = row.get(i).map_or("", String::as_str);
                        truncate(raw, col.max_width).chars().count()
                    })
                    .chain(std::iter::once(col.name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// Cut `s` to at most `max` characters.
fn truncate(s: &str, max: Option<usize>) -> &str {
    match max {
        Some(max) if s.chars().count() > max => {
            let end = s.char_indices().nth(max).map_or(s.len(), |(i, _)| i);
            &s[..end]
        }
        _ => s,
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
