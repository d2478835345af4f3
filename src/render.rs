//! Plain-text rendering of table pages for the terminal.

use crate::table::{Page, SortDirection, TableRow, TableState};

const MAX_CELL_WIDTH: usize = 32;

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let kept: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{}…", kept)
}

/// Renders the current page with a header row, aligned columns and a footer.
pub fn render_table<T: TableRow>(state: &TableState<T>) -> String {
    let page = state.view();
    let columns = T::columns();

    let headers: Vec<String> = columns
        .iter()
        .map(|c| match state.sort() {
            Some(sort) if sort.key == c.key => {
                let arrow = match sort.direction {
                    SortDirection::Asc => "↑",
                    SortDirection::Desc => "↓",
                };
                format!("{} {}", c.header, arrow)
            }
            _ => c.header.to_string(),
        })
        .collect();

    let body: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| columns.iter().map(|c| clip(&row.cell(c.key).to_string())).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format_line(&headers, &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');

    if body.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &body {
        out.push_str(&format_line(row, &widths));
        out.push('\n');
    }
    out.push_str(&footer(&page, state.filter()));
    out
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn footer<T>(page: &Page<'_, T>, filter: &str) -> String {
    let mut footer = format!("{} · page {}/{}", page.range_label(), page.page, page.total_pages);
    if !filter.is_empty() {
        footer.push_str(&format!(
            " · filter \"{}\" ({} total)",
            filter, page.unfiltered_rows
        ));
    }
    footer
}

pub fn money(amount: f64) -> String {
    format!("KES {:.2}", amount)
}
