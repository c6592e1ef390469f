use comfy_table::{Cell, Color};

use crate::upload::UploadReport;

use super::format::{create_styled_table, header_cell, styled_cell};

pub(crate) fn print_upload_report(report: &UploadReport, use_color: bool) {
    println!(
        "{} row(s), {} column(s)",
        report.row_count,
        report.columns.len()
    );

    if !report.preview.is_empty() {
        let mut table = create_styled_table();
        table.set_header(
            report
                .columns
                .iter()
                .map(|c| header_cell(c, use_color))
                .collect::<Vec<_>>(),
        );
        for row in &report.preview {
            table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
        }
        println!("{table}");
    }

    if report.has_country_column() {
        println!("Countries: {}", report.countries.join(", "));
    } else {
        println!("No country column found; the country will be \"Not specified\".");
    }

    if report.is_valid() {
        println!("All required columns are present.");
    } else {
        let warn = if use_color { Some(Color::Yellow) } else { None };
        let mut table = create_styled_table();
        table.set_header(vec![header_cell("Missing column", use_color)]);
        for name in &report.missing {
            table.add_row(vec![styled_cell(name, warn, false)]);
        }
        println!("{table}");
    }
}
