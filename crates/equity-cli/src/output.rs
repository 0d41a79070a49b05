//! Table rendering for terminal output

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use equity_research::agents::AnalysisReport;
use equity_tools::ToolRegistry;

enum Unit {
    Multiple,
    Percent,
    Amount,
}

fn format_value(value: Option<f64>, unit: &Unit) -> String {
    match (value, unit) {
        (None, _) => "n/a".to_string(),
        (Some(v), Unit::Multiple) => format!("{v:.2}"),
        (Some(v), Unit::Percent) => format!("{:.2}%", v * 100.0),
        (Some(v), Unit::Amount) => format!("{v:.0}"),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Ratios and score of a [`AnalysisReport`]
pub fn analysis_table(report: &AnalysisReport) -> Table {
    let ratios = &report.valuation_ratios;
    let rows = [
        ("P/E", ratios.pe_ratio, Unit::Multiple),
        ("PEG", ratios.peg_ratio, Unit::Multiple),
        ("Price / Book", ratios.price_to_book, Unit::Multiple),
        ("Price / Sales", ratios.price_to_sales, Unit::Multiple),
        ("EV / Revenue", ratios.ev_to_revenue, Unit::Multiple),
        ("EV / EBITDA", ratios.ev_to_ebitda, Unit::Multiple),
        ("Gross margin", ratios.gross_margin, Unit::Percent),
        ("Net margin", ratios.net_margin, Unit::Percent),
        ("Revenue growth (YoY)", ratios.revenue_yoy_growth, Unit::Percent),
        ("Debt / Equity", ratios.debt_to_equity, Unit::Multiple),
        ("Free cash flow", ratios.free_cash_flow, Unit::Amount),
    ];

    let mut table = new_table(vec![report.ticker.as_str(), "Value"]);
    for (label, value, unit) in &rows {
        table.add_row(vec![(*label).to_string(), format_value(*value, unit)]);
    }
    table.add_row(vec!["Score".to_string(), report.score.to_string()]);

    if let Some(error) = &ratios.error {
        table.add_row(vec!["Note".to_string(), error.clone()]);
    }
    table
}

/// Name, example input and description of every registered tool
pub fn tools_table(registry: &ToolRegistry) -> Table {
    let mut table = new_table(vec!["Tool", "Example input", "Description"]);
    for tool in registry.list_tools() {
        table.add_row(vec![
            tool.name().to_string(),
            tool.example_input(),
            tool.description().to_string(),
        ]);
    }
    table
}
