use std::fmt::Write;

use stock_tracker_core::models::company_info::{CompanyInfo, NOT_AVAILABLE};
use stock_tracker_core::models::report::{HoldingRow, PortfolioReport};

const RULE_WIDTH: usize = 100;

/// Render the portfolio table with a metadata block per holding.
pub(crate) fn portfolio(report: &PortfolioReport) -> String {
    if report.is_empty() {
        return "Portfolio is empty\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "\nCurrent Portfolio:");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "Symbol | Shares | Purchase Price | Current Price | Profit/Loss | Change%"
    );
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for row in &report.rows {
        out.push_str(&holding_line(row));
        out.push('\n');
        if !row.company_info.is_empty() {
            out.push_str(&company_block(&row.company_info));
        }
    }

    let _ = writeln!(
        out,
        "Total\tcost ${:.2}\tvalue ${:.2}\t\t${:.2}\t\t{:.2}%",
        report.total_cost, report.total_value, report.total_profit_loss, report.total_change_pct
    );
    let unpriced = report.rows.iter().filter(|r| !r.priced).count();
    if unpriced > 0 {
        let _ = writeln!(out, "({unpriced} holding(s) without a price yet count as zero value)");
    }
    out
}

fn holding_line(row: &HoldingRow) -> String {
    if !row.priced {
        return format!(
            "{}\t{}\t${:.2}\t\t{na}\t\t{na}\t\t{na}",
            row.symbol,
            row.shares,
            row.purchase_price,
            na = NOT_AVAILABLE
        );
    }
    format!(
        "{}\t{}\t${:.2}\t\t${:.2}\t\t${:.2}\t\t{:.2}%",
        row.symbol, row.shares, row.purchase_price, row.current_price, row.profit_loss, row.change_pct
    )
}

fn company_block(info: &CompanyInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nCompany Information:");
    let _ = writeln!(out, "  📌 Name: {}", CompanyInfo::display_text(&info.name));
    let _ = writeln!(out, "  🏢 Sector: {}", CompanyInfo::display_text(&info.sector));
    let _ = writeln!(out, "  💰 Market Cap: {}", CompanyInfo::display_number(info.market_cap));
    let _ = writeln!(out, "  📊 P/E Ratio: {}", CompanyInfo::display_number(info.pe_ratio));
    let _ = writeln!(
        out,
        "  💵 Dividend Yield: {}",
        CompanyInfo::display_number(info.dividend_yield)
    );
    let _ = writeln!(
        out,
        "  📈 52-Week High: ${}",
        CompanyInfo::display_number(info.week_52_high)
    );
    let _ = writeln!(
        out,
        "  📉 52-Week Low: ${}",
        CompanyInfo::display_number(info.week_52_low)
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    out
}
