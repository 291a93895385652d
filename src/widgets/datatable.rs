use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

/// Scroll and sort state for the filtered table. `col_offset` is the first
/// visible column; sorting applies to it.
#[derive(Debug, Clone, Default)]
pub struct TableViewState {
    pub row_offset: usize,
    pub col_offset: usize,
    /// Sort column name and descending flag
    pub sort: Option<(String, bool)>,
    /// Rows the table area can show; set during render, used for paging
    pub page_rows: usize,
}

impl TableViewState {
    fn max_row_offset(&self, total_rows: usize) -> usize {
        total_rows.saturating_sub(self.page_rows.max(1))
    }

    pub fn scroll_down(&mut self, lines: usize, total_rows: usize) {
        self.row_offset = (self.row_offset + lines).min(self.max_row_offset(total_rows));
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.row_offset = self.row_offset.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.row_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, total_rows: usize) {
        self.row_offset = self.max_row_offset(total_rows);
    }

    pub fn scroll_right(&mut self, total_cols: usize) {
        if self.col_offset + 1 < total_cols {
            self.col_offset += 1;
        }
    }

    pub fn scroll_left(&mut self) {
        self.col_offset = self.col_offset.saturating_sub(1);
    }

    /// Pull offsets back into range after the frame shrank.
    pub fn clamp(&mut self, total_rows: usize, total_cols: usize) {
        self.row_offset = self.row_offset.min(self.max_row_offset(total_rows));
        if total_cols > 0 {
            self.col_offset = self.col_offset.min(total_cols - 1);
        } else {
            self.col_offset = 0;
        }
    }
}

/// Renders the filtered frame as a scrollable table. Columns are sized to
/// their visible content and rendered from `col_offset` until the width of
/// the area is used up.
pub struct DataTable<'a> {
    frame: &'a DataFrame,
    state: &'a TableViewState,
    date_format: Option<&'a str>,
}

impl<'a> DataTable<'a> {
    pub fn new(
        frame: &'a DataFrame,
        state: &'a TableViewState,
        date_format: Option<&'a str>,
    ) -> Self {
        Self {
            frame,
            state,
            date_format,
        }
    }
}

const MAX_COLUMN_WIDTH: u16 = 30;
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn datetime_from_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value)?,
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value)?,
    };
    Some(utc.naive_utc())
}

fn fmt_cell(value: AnyValue, date_format: Option<&str>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Datetime(ts, unit, _) => match datetime_from_timestamp(ts, unit) {
            Some(datetime) => datetime
                .format(date_format.unwrap_or(DEFAULT_DATE_FORMAT))
                .to_string(),
            None => value.str_value().into_owned(),
        },
        other => other.str_value().into_owned(),
    }
}

impl Widget for &DataTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title("Filtered Data");
        let inner = block.inner(area);
        if inner.height < 2 {
            block.render(area, buf);
            return;
        }

        let visible_rows = inner.height as usize - 1; // header line
        let window = self.frame.slice(self.state.row_offset as i64, visible_rows);
        let names = self.frame.get_column_names();
        let columns = window.get_columns();

        // Measure and collect the columns that fit, starting at col_offset
        let mut header_cells: Vec<Cell> = Vec::new();
        let mut widths: Vec<Constraint> = Vec::new();
        let mut column_texts: Vec<Vec<String>> = Vec::new();
        let mut used: u16 = 0;

        for idx in self.state.col_offset..columns.len() {
            let name = names[idx].as_str();
            let header_text = match &self.state.sort {
                Some((column, descending)) if column == name => {
                    format!("{} {}", name, if *descending { "v" } else { "^" })
                }
                _ => name.to_string(),
            };

            let mut texts = Vec::with_capacity(window.height());
            let mut width = header_text.chars().count() as u16;
            for row_idx in 0..window.height() {
                let text = match columns[idx].get(row_idx) {
                    Ok(value) => fmt_cell(value, self.date_format),
                    Err(_) => String::new(),
                };
                width = width.max(text.chars().count() as u16);
                texts.push(text);
            }
            let mut width = width.min(MAX_COLUMN_WIDTH);

            // +1 for column spacing; always show at least one column
            if used + width + 1 > inner.width {
                if !column_texts.is_empty() {
                    break;
                }
                width = inner.width.saturating_sub(1);
            }
            used += width + 1;

            header_cells.push(Cell::from(header_text).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            ));
            widths.push(Constraint::Length(width));
            column_texts.push(texts);
        }

        let rows: Vec<Row> = (0..window.height())
            .map(|row_idx| {
                Row::new(
                    column_texts
                        .iter()
                        .map(|texts| Cell::from(texts[row_idx].clone()))
                        .collect::<Vec<Cell>>(),
                )
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(Row::new(header_cells))
            .block(block);
        table.render(area, buf);
    }
}
