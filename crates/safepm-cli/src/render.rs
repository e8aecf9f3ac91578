//! Fixed-width table rendering

use safepm_service::TableData;

/// Print a table with columns padded to their widest cell.
pub fn print_table(table: &TableData) {
    if table.is_empty() {
        println!("(no entries)");
        return;
    }

    let columns = table.header.len();
    let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render_row = |cells: Vec<&str>| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
            if i + 1 < columns {
                line.push_str("  ");
            }
        }
        line
    };

    let header = render_row(table.header.to_vec());
    println!("{}", header);
    println!("{}", "-".repeat(header.chars().count()));
    for row in &table.rows {
        println!("{}", render_row(row.iter().map(String::as_str).collect()));
    }
}
