/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - The catalogue listing
/// - Scenario header, overview and supplier cards
/// - The grouped comparison table with collapsible categories
/// - Bid details and the key fields reference
/// - Text truncation, padding and wrapping
///
/// It accepts data already prepared by the comparison pipeline and renders it.
///
/// ## Output Flexibility
///
/// This module supports writing to any `std::io::Write` destination:
/// - Console (stdout) with optional colors
/// - String buffers (for tests)
/// - Files
use crate::catalog::Catalog;
use crate::comparison::{self, Cell, ComparisonTable, GroupView};
use crate::types::{Category, CategoryField, Facet, PRICE_KEY, Supplier, TenderConfig, TenderOverview};
use std::io::{self, Write};
use std::sync::OnceLock;
use term::Terminal;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Color used for cells that need follow-up (TBC, not required)
const FLAG_COLOR: Color = term::color::BRIGHT_YELLOW;
const HEADING_COLOR: Color = term::color::BRIGHT_CYAN;

/// Number of highlight fields shown on a supplier card
const CARD_FIELDS: usize = 4;

/// Writer for console output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Hand back the underlying writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors {
            // Use RGB for bright yellow (better Windows Terminal support)
            if color == term::color::BRIGHT_YELLOW {
                return write!(self.writer, "\x1b[38;2;255;255;102m{}\x1b[0m", text);
            }
            if let Some(result) = self.write_terminfo_colored(text, color) {
                return result;
            }
        }
        write!(self.writer, "{}", text)
    }

    /// Color through terminfo; `None` when no terminfo entry is available
    fn write_terminfo_colored(&mut self, text: &str, color: Color) -> Option<io::Result<()>> {
        let mut t = term::TerminfoTerminal::new(&mut self.writer)?;
        let _ = t.fg(color);
        let written = t.write_all(text.as_bytes());
        let _ = t.reset();
        Some(written)
    }

    /// Write a newline
    fn writeln(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }

    fn write_heading(&mut self, text: &str) -> io::Result<()> {
        self.write_colored(text, HEADING_COLOR)?;
        self.writeln()
    }

    //
    // Catalogue page
    //

    /// Write the list of available scenarios
    pub fn write_catalog(&mut self, catalog: &Catalog) -> io::Result<()> {
        self.write_heading("Tenders")?;
        writeln!(self.writer)?;

        if catalog.tenders.is_empty() {
            return writeln!(self.writer, "No tenders in catalogue.");
        }

        let slug_width = catalog.tenders.iter().map(|t| display_width(&t.slug)).max().unwrap_or(4).max(4) + 2;
        writeln!(
            self.writer,
            "{}{}{}{}",
            truncate_with_padding("Slug", slug_width),
            truncate_with_padding("Title", 44),
            truncate_with_padding("Responses", 16),
            "Closed"
        )?;
        writeln!(self.writer, "{}", "━".repeat(slug_width + 44 + 16 + 12))?;

        for tender in &catalog.tenders {
            let responses = format!("{}/{} ({}%)", tender.overview.submitted, tender.overview.invited, tender.overview.response_rate);
            writeln!(
                self.writer,
                "{}{}{}{}",
                truncate_with_padding(&tender.slug, slug_width),
                truncate_with_padding(&tender.title, 44),
                truncate_with_padding(&responses, 16),
                tender.overview.closed_date.format("%-d %b %Y")
            )?;
            writeln!(
                self.writer,
                "{:slug_width$}{}",
                "",
                format_tags_line(&tender.location, &tender.tags),
                slug_width = slug_width
            )?;
        }
        Ok(())
    }

    //
    // Scenario page
    //

    /// Write the title block: title, location, tags
    pub fn write_scenario_header(&mut self, config: &TenderConfig) -> io::Result<()> {
        self.write_heading(&config.title)?;
        writeln!(self.writer, "{}", format_tags_line(&config.location, &config.tags))?;
        if !config.description.is_empty() {
            for line in wrap_text(&config.description, get_console_width().saturating_sub(2).max(20)) {
                writeln!(self.writer, "{}", line)?;
            }
        }
        writeln!(self.writer)
    }

    /// Write the tender overview, with the breakdown when `show_details` is set
    pub fn write_overview(&mut self, overview: &TenderOverview, show_details: bool) -> io::Result<()> {
        writeln!(
            self.writer,
            "Tender Overview: {}    [Closed: {}]",
            overview.summary_line(),
            overview.closed_date.format("%-d %b")
        )?;

        if show_details {
            for detail in &overview.details {
                writeln!(self.writer, "  • {}", detail)?;
            }
            writeln!(
                self.writer,
                "  Tender closed: {} | Duration: {}",
                overview.closed_date.format("%-d %b %Y"),
                overview.duration
            )?;
        }
        writeln!(self.writer)
    }

    /// Write the floating compare shortcut shown once the page is scrolled
    pub fn write_compare_shortcut(&mut self, supplier_count: usize) -> io::Result<()> {
        self.write_colored(&format!("[Compare ↓] Jump to the detailed comparison of {} suppliers", supplier_count), HEADING_COLOR)?;
        self.writeln()?;
        self.writeln()
    }

    /// Write one card per supplier, in the order given
    pub fn write_supplier_cards(
        &mut self,
        config: &TenderConfig,
        suppliers: &[&Supplier],
        categories: &[&Category],
        facet: Facet,
    ) -> io::Result<()> {
        self.write_heading("Interim Tender Results")?;

        let highlights: Vec<(&Category, &CategoryField)> = categories
            .iter()
            .copied()
            .flat_map(|c| c.fields.iter().map(move |f| (c, f)))
            .filter(|(_, f)| f.key != PRICE_KEY)
            .take(CARD_FIELDS)
            .collect();

        let inner = get_console_width().min(100).saturating_sub(4).max(30);

        for (rank, supplier) in suppliers.iter().enumerate() {
            writeln!(self.writer, "╭{}╮", "─".repeat(inner + 2))?;

            let title = format!("{}. {}", rank + 1, supplier.name);
            self.write_card_line(&title, inner, None)?;

            let price = format_price(config, supplier);
            let score = format_score(supplier.general_score(facet));
            self.write_card_line(&format!("Price: {}    {} score: {}", price, capitalize(facet.as_str()), score), inner, None)?;

            for (category, field) in &highlights {
                let cell = comparison::format_cell(config, supplier, category, field);
                let line = format!("{}: {}", field.label, cell.text);
                self.write_card_line(&line, inner, cell.flagged.then_some(FLAG_COLOR))?;
            }

            if !supplier.key_differentiator.is_empty() {
                for (i, line) in wrap_text(&supplier.key_differentiator, inner.saturating_sub(20).max(10)).iter().enumerate() {
                    let label = if i == 0 { "Key differentiator: " } else { "                    " };
                    self.write_card_line(&format!("{}{}", label, line), inner, None)?;
                }
            }

            writeln!(self.writer, "╰{}╯", "─".repeat(inner + 2))?;
        }
        writeln!(self.writer)
    }

    fn write_card_line(&mut self, text: &str, inner: usize, color: Option<Color>) -> io::Result<()> {
        write!(self.writer, "│ ")?;
        let padded = truncate_with_padding(text, inner);
        match color {
            Some(color) => self.write_colored(&padded, color)?,
            None => write!(self.writer, "{}", padded)?,
        }
        writeln!(self.writer, " │")
    }

    /// Write the grouped comparison table
    ///
    /// Collapsed categories are a single spanning line; expanded categories
    /// are followed by one grid row per field.
    pub fn write_comparison_table(&mut self, table: &ComparisonTable) -> io::Result<()> {
        self.write_heading("Detailed Comparison")?;

        let w = TableWidths::new(get_console_width(), table.suppliers.len());
        let columns = w.columns(table.suppliers.len());

        writeln!(self.writer, "{}", border_line('┌', '┬', '┐', &columns))?;

        let mut header_cells = vec![comparison::HEADER_LABEL.to_string()];
        header_cells.extend(table.suppliers.iter().cloned());
        self.write_grid_row(&header_cells.iter().map(|s| Cell { text: s.clone(), flagged: false }).collect::<Vec<_>>(), &columns)?;

        let mut prev = RowKind::Header;
        for group in &table.groups {
            // Spanning category line
            match prev {
                RowKind::Header | RowKind::Grid => writeln!(self.writer, "{}", border_line('├', '┴', '┤', &columns))?,
                RowKind::Span => {}
            }
            self.write_span_row(&group_title(group), w.span_inner(table.suppliers.len()))?;
            prev = RowKind::Span;

            for (i, row) in group.rows.iter().enumerate() {
                if i == 0 {
                    writeln!(self.writer, "{}", border_line('├', '┬', '┤', &columns))?;
                }
                let mut cells = vec![Cell { text: format!("  {}", row.label), flagged: false }];
                cells.extend(row.cells.iter().cloned());
                self.write_grid_row(&cells, &columns)?;
                prev = RowKind::Grid;
            }
        }

        match prev {
            RowKind::Span => writeln!(self.writer, "└{}┘", "─".repeat(w.total.saturating_sub(2)))?,
            RowKind::Header | RowKind::Grid => writeln!(self.writer, "{}", border_line('└', '┴', '┘', &columns))?,
        }
        writeln!(self.writer)
    }

    fn write_grid_row(&mut self, cells: &[Cell], columns: &[usize]) -> io::Result<()> {
        write!(self.writer, "│")?;
        for (cell, width) in cells.iter().zip(columns) {
            let padded = format!(" {} ", truncate_with_padding(&cell.text, width.saturating_sub(2)));
            if cell.flagged {
                self.write_colored(&padded, FLAG_COLOR)?;
            } else {
                write!(self.writer, "{}", padded)?;
            }
            write!(self.writer, "│")?;
        }
        self.writeln()
    }

    fn write_span_row(&mut self, text: &str, inner: usize) -> io::Result<()> {
        writeln!(self.writer, "│ {} │", truncate_with_padding(text, inner.saturating_sub(2)))
    }

    //
    // Bid details and key fields
    //

    /// Write the full bid for one supplier
    pub fn write_supplier_details(
        &mut self,
        config: &TenderConfig,
        supplier: &Supplier,
        categories: &[&Category],
        facet: Facet,
    ) -> io::Result<()> {
        self.write_heading(&supplier.name)?;
        let price = format_price(config, supplier);
        writeln!(self.writer, "Price: {}", price)?;
        writeln!(self.writer)?;

        writeln!(self.writer, "Scores")?;
        for f in facet.priority() {
            let marker = if f == facet { "▸" } else { " " };
            writeln!(
                self.writer,
                "  {} {}{}",
                marker,
                truncate_with_padding(&capitalize(f.as_str()), 12),
                format_score(supplier.general_score(f))
            )?;
        }
        writeln!(self.writer)?;

        let label_width = categories
            .iter()
            .flat_map(|c| c.fields.iter())
            .map(|f| display_width(&f.label))
            .max()
            .unwrap_or(10)
            .min(40)
            + 2;

        for category in categories {
            writeln!(self.writer, "{}", category.name)?;
            for field in &category.fields {
                let cell = comparison::format_cell(config, supplier, category, field);
                write!(self.writer, "  {}", truncate_with_padding(&field.label, label_width))?;
                if cell.flagged {
                    self.write_colored(&cell.text, FLAG_COLOR)?;
                    self.writeln()?;
                } else {
                    writeln!(self.writer, "{}", cell.text)?;
                }
            }
            writeln!(self.writer)?;
        }

        let wrap_width = get_console_width().saturating_sub(4).max(20);
        if !supplier.additional_notes.is_empty() {
            writeln!(self.writer, "Additional notes")?;
            for line in wrap_text(&supplier.additional_notes, wrap_width) {
                writeln!(self.writer, "  {}", line)?;
            }
            writeln!(self.writer)?;
        }
        if !supplier.key_differentiator.is_empty() {
            writeln!(self.writer, "Key differentiator")?;
            for line in wrap_text(&supplier.key_differentiator, wrap_width) {
                writeln!(self.writer, "  {}", line)?;
            }
            writeln!(self.writer)?;
        }
        if !supplier.documents.is_empty() {
            writeln!(self.writer, "Documents")?;
            for doc in &supplier.documents {
                writeln!(self.writer, "  • {} ({})", doc.name, doc.url)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Write the key fields reference: explanations and tooltips by field label
    pub fn write_key_fields(&mut self, config: &TenderConfig) -> io::Result<()> {
        self.write_heading("Key fields explained")?;
        writeln!(self.writer)?;

        let wrap_width = get_console_width().saturating_sub(4).max(20);
        let mut any = false;
        for category in &config.categories {
            for field in &category.fields {
                let explanation = config.field_explanations.get(&field.key).or(field.tooltip.as_ref());
                if let Some(explanation) = explanation {
                    any = true;
                    writeln!(self.writer, "{}", field.label)?;
                    for line in wrap_text(explanation, wrap_width) {
                        writeln!(self.writer, "  {}", line)?;
                    }
                }
            }
        }

        // Explanations for keys no category shows
        for (key, explanation) in &config.field_explanations {
            if config.categories.iter().any(|c| c.fields.iter().any(|f| &f.key == key)) {
                continue;
            }
            any = true;
            writeln!(self.writer, "{}", key)?;
            for line in wrap_text(explanation, wrap_width) {
                writeln!(self.writer, "  {}", line)?;
            }
        }

        if !any {
            writeln!(self.writer, "No field explanations for this tender.")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Header,
    Span,
    Grid,
}

fn group_title(group: &GroupView) -> String {
    if group.expanded { format!("▾ {}", group.name) } else { format!("▸ {}", group.name) }
}

fn border_line(left: char, mid: char, right: char, columns: &[usize]) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in columns.iter().enumerate() {
        if i > 0 {
            line.push(mid);
        }
        line.push_str(&"─".repeat(*width));
    }
    line.push(right);
    line
}

fn format_tags_line(location: &str, tags: &[String]) -> String {
    let tags: Vec<String> = tags.iter().map(|t| format!("[{}]", t)).collect();
    if tags.is_empty() { location.to_string() } else { format!("{}  {}", location, tags.join(" ")) }
}

/// Supplier price with the scenario currency, e.g. "£45,000"
fn format_price(config: &TenderConfig, supplier: &Supplier) -> String {
    comparison::format_value(Some(comparison::RawValue::Number(supplier.price)), config.unit_for(PRICE_KEY).as_ref(), false)
}

fn format_score(score: Option<f64>) -> String {
    score.map_or(comparison::PLACEHOLDER.to_string(), |s| format!("{:.1}/5", s))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//
// Table Layout and Widths
//

/// Column widths for the comparison table (each includes one space of padding per side)
#[derive(Clone, Copy, Debug)]
pub struct TableWidths {
    pub label: usize,
    pub supplier: usize,
    pub total: usize, // Total table width including borders
}

impl TableWidths {
    pub fn new(terminal_width: usize, supplier_count: usize) -> Self {
        // Borders: one before each column plus one at the end
        let borders = supplier_count + 2;
        let available = terminal_width.saturating_sub(borders);

        let label = 30;
        let supplier = if supplier_count == 0 {
            0
        } else {
            (available.saturating_sub(label) / supplier_count).clamp(14, 32)
        };

        TableWidths { label, supplier, total: label + supplier * supplier_count + borders }
    }

    /// Widths of every column, label first
    pub fn columns(&self, supplier_count: usize) -> Vec<usize> {
        let mut columns = vec![self.label];
        columns.extend(std::iter::repeat_n(self.supplier, supplier_count));
        columns
    }

    /// Inner width of a row spanning all columns
    pub fn span_inner(&self, supplier_count: usize) -> usize {
        self.label + self.supplier * supplier_count + supplier_count
    }
}

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Override the detected console width (used by --console-width and tests)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width); // Ignore error if already initialized
}

/// Console width: override, detected terminal width, or 120
pub fn get_console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(get_terminal_width)
}

/// Get terminal width or default to 120
fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        120 // Default width
    }
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w > width {
        let mut result = String::new();
        let mut current_width = 0;

        // Reserve space for "..."
        let target_width = if width >= 3 { width - 3 } else { width };

        for c in s.chars() {
            let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
            if current_width + c_width > target_width {
                break;
            }
            result.push(c);
            current_width += c_width;
        }

        if width >= 3 {
            result.push_str("...");
            current_width += 3;
        }

        if current_width < width {
            result.push_str(&" ".repeat(width - current_width));
        }

        result
    } else {
        format!("{}{}", s, " ".repeat(width - display_w))
    }
}

/// Greedy word wrap to the given display width; overlong words are kept whole
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if display_width(&current) + 1 + display_width(word) <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

//
// Stdout helpers
//

/// Print the catalogue to stdout
pub fn print_catalog(catalog: &Catalog, use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_catalog(catalog);
}

/// Print the key fields reference to stdout
pub fn print_key_fields(config: &TenderConfig, use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_key_fields(config);
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
