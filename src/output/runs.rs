use comfy_table::{Cell, Color};

use crate::runs::{RunArtifacts, RunSelector, model_id};

use super::format::{create_styled_table, header_cell, styled_cell};

/// Run folders, newest first; the selected folder is marked
pub(crate) fn print_runs_table(selector: &RunSelector, selected: Option<&str>, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("", use_color),
        header_cell("Folder", use_color),
        header_cell("Run on", use_color),
    ]);

    let selected_color = if use_color { Some(Color::Green) } else { None };
    for entry in selector.entries() {
        let is_selected = selected == Some(entry.folder.as_str());
        table.add_row(vec![
            Cell::new(if is_selected { "*" } else { "" }),
            styled_cell(
                &entry.folder,
                if is_selected { selected_color } else { None },
                is_selected,
            ),
            Cell::new(&entry.run_on),
        ]);
    }

    println!("{table}");
    println!("{} run folder(s)", selector.entries().len());
}

pub(crate) fn print_charts_table(
    label: &str,
    artifacts: &RunArtifacts,
    selected_model: Option<&str>,
    use_color: bool,
) {
    println!("{label}");

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Kind", use_color),
        header_cell("File", use_color),
        header_cell("Model", use_color),
    ]);

    let default_chart = artifacts.default_chart();
    let highlight = if use_color { Some(Color::Green) } else { None };
    for name in &artifacts.diagnostics {
        let is_default = default_chart == Some(name.as_str());
        table.add_row(vec![
            Cell::new("diagnostic"),
            styled_cell(name, None, is_default),
            Cell::new(""),
        ]);
    }
    for name in &artifacts.candidates {
        let id = model_id(name);
        let is_selected = selected_model == Some(id);
        table.add_row(vec![
            Cell::new("candidate"),
            Cell::new(name),
            styled_cell(id, if is_selected { highlight } else { None }, is_selected),
        ]);
    }

    if artifacts.diagnostics.is_empty() && artifacts.candidates.is_empty() {
        println!("No chart images found.");
        return;
    }
    println!("{table}");
    if let Some(chart) = default_chart {
        println!("Default chart: {chart}");
    }
}
