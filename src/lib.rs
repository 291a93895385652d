use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use polars::prelude::{DataFrame, SortMultipleOptions};
use std::path::PathBuf;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, StatefulWidget};

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod export;
pub mod filters;
pub mod metrics;
pub mod select_modal;
pub mod widgets;

pub use cache::DatasetCache;
pub use cli::Args;
pub use config::{AppConfig, ConfigManager};

use data::Dataset;
use filters::{apply_filters, CategoryField, FilterOptions, FilterState};
use metrics::Metrics;
use select_modal::SelectModal;
use widgets::controls::Controls;
use widgets::datatable::{DataTable, TableViewState};
use widgets::metrics::MetricTiles;

/// Application name used for config directory and other app-specific paths
pub const APP_NAME: &str = "kycdash";

/// Page title
pub const TITLE: &str = "KYC Process Dashboard";

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Open(PathBuf),
    Export,
    Exit,
    Crash(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Inline message shown above the metric tiles; never fatal.
#[derive(Debug, Clone)]
pub struct Banner {
    pub severity: Severity,
    pub message: String,
}

/// One fully recomputed pass of the pipeline: the filtered frame, the
/// dropdown option lists, and the metrics derived from the frame.
pub struct DashboardView {
    pub frame: DataFrame,
    pub options: FilterOptions,
    pub metrics: Metrics,
}

pub struct App {
    config: AppConfig,
    cache: DatasetCache,
    source_path: Option<PathBuf>,
    dataset: Option<Dataset>,
    filter: FilterState,
    view: Option<DashboardView>,
    table: TableViewState,
    modal: SelectModal,
    banners: Vec<Banner>,
    pipeline_error: Option<String>,
    status: Option<String>,
    export_dir: PathBuf,
}

impl App {
    pub fn new() -> App {
        Self::new_with_config(AppConfig::default())
    }

    pub fn new_with_config(config: AppConfig) -> App {
        let export_dir = config
            .export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        App {
            config,
            cache: DatasetCache::new(),
            source_path: None,
            dataset: None,
            filter: FilterState::default(),
            view: None,
            table: TableViewState::default(),
            modal: SelectModal::new(),
            banners: Vec::new(),
            pipeline_error: None,
            status: None,
            export_dir,
        }
    }

    pub fn set_export_dir(&mut self, dir: PathBuf) {
        self.export_dir = dir;
    }

    pub fn export_dir(&self) -> &std::path::Path {
        &self.export_dir
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Handle an event. Returns a follow-up event to queue, if any.
    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.handle_key(*key),
            AppEvent::Resize(_, _) => None,
            AppEvent::Open(path) => {
                self.open(path.clone());
                None
            }
            AppEvent::Export => {
                self.export();
                None
            }
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn open(&mut self, path: PathBuf) {
        self.banners.clear();
        self.status = None;
        match self.cache.load(&path) {
            Ok(dataset) => {
                let missing = data::missing_required_columns(&dataset.frame);
                if !missing.is_empty() {
                    self.banners.push(Banner {
                        severity: Severity::Warning,
                        message: format!("Missing columns in dataset: {}", missing.join(", ")),
                    });
                }
                if !dataset.date_available {
                    self.banners.push(Banner {
                        severity: Severity::Error,
                        message:
                            "The dataset is missing a usable 'created_at' column; date filtering is disabled"
                                .to_string(),
                    });
                }
                self.dataset = Some(dataset);
                self.source_path = Some(path);
                self.filter = FilterState::default();
                self.table = TableViewState::default();
                self.refresh();
            }
            Err(e) => self.banners.push(Banner {
                severity: Severity::Error,
                message: format!("Could not load {}: {}", path.display(), e),
            }),
        }
    }

    /// Re-run the whole pipeline. Called after every interaction that changes
    /// filter or sort state; the loaded dataset is the only cached artifact.
    fn refresh(&mut self) {
        self.pipeline_error = None;
        self.view = None;
        let Some(dataset) = self.dataset.clone() else {
            return;
        };
        let now = Local::now().naive_local();

        let result = apply_filters(&dataset, &self.filter, now).and_then(|filtered| {
            let mut frame = filtered.frame;
            if let Some((column, descending)) = &self.table.sort {
                if frame.column(column).is_ok() {
                    frame = frame.sort(
                        [column.as_str()],
                        SortMultipleOptions::default().with_order_descending(*descending),
                    )?;
                }
            }
            let metrics = metrics::compute(&frame)?;
            Ok(DashboardView {
                frame,
                options: filtered.options,
                metrics,
            })
        });

        match result {
            Ok(view) => {
                self.table.clamp(view.frame.height(), view.frame.width());
                self.view = Some(view);
            }
            Err(e) => self.pipeline_error = Some(format!("Filter pipeline failed: {}", e)),
        }
    }

    fn export(&mut self) {
        let Some(view) = &self.view else {
            self.status = Some("Nothing to export".to_string());
            return;
        };
        match export::write_filtered_csv(&view.frame, &self.export_dir) {
            Ok(path) => self.status = Some(format!("Wrote {}", path.display())),
            Err(e) => self.status = Some(format!("Export failed: {}", e)),
        }
    }

    fn open_modal(&mut self, field: CategoryField) {
        let Some(view) = &self.view else {
            return;
        };
        let options = view.options.for_field(field).to_vec();
        let current = self.filter.selection(field).map(str::to_string);
        self.modal.open(field, options, current.as_deref());
    }

    fn toggle_sort(&mut self) {
        let Some(view) = &self.view else {
            return;
        };
        let names = view.frame.get_column_names();
        let Some(name) = names.get(self.table.col_offset) else {
            return;
        };
        let name = name.to_string();
        let descending = match &self.table.sort {
            Some((column, descending)) if *column == name => !*descending,
            _ => false,
        };
        self.table.sort = Some((name, descending));
        self.refresh();
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Down => self.modal.next(),
            KeyCode::Up => self.modal.previous(),
            KeyCode::Enter => {
                if let (Some(field), Some(choice)) = (self.modal.field, self.modal.choice()) {
                    self.filter.set_selection(field, choice);
                    self.modal.close();
                    self.refresh();
                }
            }
            KeyCode::Esc => self.modal.close(),
            _ => {}
        }
        None
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.modal.active {
            return self.handle_modal_key(key);
        }

        let total_rows = self.view.as_ref().map(|v| v.frame.height()).unwrap_or(0);
        let total_cols = self.view.as_ref().map(|v| v.frame.width()).unwrap_or(0);
        let page = self.table.page_rows.max(1);

        match key.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Char('e') => return Some(AppEvent::Export),
            KeyCode::Char('d') => {
                self.filter.date_range = self.filter.date_range.next();
                self.refresh();
            }
            KeyCode::Char('R') => {
                self.filter.reset();
                self.table = TableViewState::default();
                self.refresh();
            }
            KeyCode::Char('s') => self.toggle_sort(),
            KeyCode::Char('1') => self.open_modal(CategoryField::CaseStatus),
            KeyCode::Char('2') => self.open_modal(CategoryField::CheckType),
            KeyCode::Char('3') => self.open_modal(CategoryField::RiskLevel),
            KeyCode::Char('4') => self.open_modal(CategoryField::Country),
            KeyCode::Down => self.table.scroll_down(1, total_rows),
            KeyCode::Up => self.table.scroll_up(1),
            KeyCode::PageDown => self.table.scroll_down(page, total_rows),
            KeyCode::PageUp => self.table.scroll_up(page),
            KeyCode::Home => self.table.scroll_to_top(),
            KeyCode::End => self.table.scroll_to_bottom(total_rows),
            KeyCode::Right => self.table.scroll_right(total_cols),
            KeyCode::Left => self.table.scroll_left(),
            _ => {}
        }
        None
    }

    fn render_banners(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .banners
            .iter()
            .map(|banner| {
                let color = match banner.severity {
                    Severity::Warning => Color::Yellow,
                    Severity::Error => Color::Red,
                };
                Line::styled(banner.message.clone(), Style::default().fg(color))
            })
            .chain(
                self.pipeline_error
                    .iter()
                    .map(|message| Line::styled(message.clone(), Style::default().fg(Color::Red))),
            )
            .collect();
        Paragraph::new(lines).render(area, buf);
    }

    fn render_modal(&mut self, area: Rect, buf: &mut Buffer) {
        let Some(field) = self.modal.field else {
            return;
        };
        let width = 36.min(area.width);
        let height = (self.modal.entry_count() as u16 + 2).min(area.height.saturating_sub(2));
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };
        Clear.render(popup, buf);

        let items: Vec<ListItem> = std::iter::once("All".to_string())
            .chain(self.modal.options.iter().cloned())
            .map(ListItem::new)
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(field.label())
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            );
        StatefulWidget::render(list, popup, buf, &mut self.modal.list_state);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let banner_lines = self.banners.len() + usize::from(self.pipeline_error.is_some());

        let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
        if banner_lines > 0 {
            constraints.push(Constraint::Length(banner_lines as u16));
        }
        constraints.push(Constraint::Length(MetricTiles::HEIGHT));
        constraints.push(Constraint::Fill(1));
        if self.status.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Controls
        let layout = Layout::new(Direction::Vertical, constraints).split(area);

        let mut idx = 0;
        Paragraph::new(TITLE)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .render(layout[idx], buf);
        idx += 1;

        let subheading = format!(
            "Overview of KYC Cases and Alerts ({})",
            self.filter.date_range.label()
        );
        Paragraph::new(subheading)
            .style(Style::default().fg(Color::DarkGray))
            .render(layout[idx], buf);
        idx += 1;

        if banner_lines > 0 {
            self.render_banners(layout[idx], buf);
            idx += 1;
        }

        let tiles_area = layout[idx];
        idx += 1;
        let table_area = layout[idx];
        idx += 1;

        // Header + borders take three lines of the table area
        self.table.page_rows = table_area.height.saturating_sub(3) as usize;

        match &self.view {
            Some(view) => {
                MetricTiles::new(&view.metrics).render(tiles_area, buf);
                DataTable::new(
                    &view.frame,
                    &self.table,
                    self.config.display.date_format.as_deref(),
                )
                .render(table_area, buf);
            }
            None => {
                Block::default()
                    .borders(Borders::ALL)
                    .title("Filtered Data")
                    .render(table_area, buf);
                Paragraph::new("No data loaded")
                    .style(Style::default().fg(Color::DarkGray))
                    .render(tiles_area, buf);
            }
        }

        if let Some(status) = &self.status {
            Paragraph::new(status.clone())
                .style(Style::default().fg(Color::Green))
                .render(layout[idx], buf);
            idx += 1;
        }

        let row_count = self.view.as_ref().map(|v| v.frame.height());
        let controls = match row_count {
            Some(count) => Controls::with_row_count(count),
            None => Controls::new(),
        };
        controls
            .with_dimmed(self.modal.active)
            .render(layout[idx], buf);

        if self.modal.active {
            self.render_modal(area, buf);
        }
    }
}
