//! Terminal rendering of reports.

use analytics::{CalendarMonth, FilterSummary, Kpis, RiskOfRuin, StatisticsReport, TagStat};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Row, Table};

const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn new_table<T: Into<Row>>(header: T) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

/// Green for gains, red for losses.
fn colored(text: String, value: f64) -> Cell {
    let cell = Cell::new(text);
    if value > 0.0 {
        cell.fg(Color::Green)
    } else if value < 0.0 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn signed_cell(value: f64, suffix: &str) -> Cell {
    colored(format!("{value:+.2}{suffix}"), value)
}

pub fn print_report(report: &StatisticsReport) {
    if report.no_data {
        println!("No trades in the journal.");
        return;
    }

    println!("\n--- Performance ---");
    println!("{}", kpi_table(&report.kpis));

    let sections: [(&str, &[TagStat]); 9] = [
        ("Timeframes", &report.timeframe_table),
        ("Alignment", &report.alignment_table),
        ("Confluences", &report.confluence_table),
        ("Pros", &report.pros_table),
        ("Cons", &report.cons_table),
        ("Assets", &report.asset_table),
        ("Weekdays", &report.weekday_table),
        ("Direction", &report.direction_table),
        ("Emotions", &report.emotion_table),
    ];
    for (title, stats) in sections {
        if stats.is_empty() {
            continue;
        }
        println!("\n--- {title} ---");
        println!("{}", tag_table(stats));
    }

    if let Some(best) = &report.best_week {
        println!(
            "\nBest week of the month: {} ({:+.2}%, {} trades)",
            best.name, best.net_result, best.total
        );
    }

    println!("\n--- Calendar {:04}-{:02} ---", report.calendar.year, report.calendar.month);
    println!("{}", calendar_table(&report.calendar));

    let hours: Vec<_> = report.hourly.iter().filter(|h| h.total() > 0).collect();
    if !hours.is_empty() {
        println!("\n--- Hourly ---");
        let mut table = new_table(["Hour", "Target", "Stop Loss", "Breakeven"]);
        for bucket in hours {
            table.add_row(vec![
                Cell::new(bucket.label()),
                Cell::new(bucket.targets),
                Cell::new(bucket.stops),
                Cell::new(bucket.breakevens),
            ]);
        }
        println!("{table}");
    }

    println!(
        "\nEquity: {:+.2}% over {} trades, projected {:+.2}% after {} more",
        report.equity.final_value(),
        report.equity.values.len(),
        report.equity.projection.last().copied().unwrap_or_default(),
        report.equity.projection.len()
    );

    println!("\n--- Risk of Ruin ---");
    println!("{}", risk_table(&report.risk_of_ruin));

    if !report.insights.is_empty() {
        println!("\n--- Insights ---");
        for insight in &report.insights {
            println!("  * {insight}");
        }
    }
}

fn kpi_table(k: &Kpis) -> Table {
    let mut table = new_table(["Metric", "Value"]);
    let rows: Vec<(&str, Cell)> = vec![
        ("Trades (all)", Cell::new(k.total_trades)),
        ("Trades (active)", Cell::new(k.total_active)),
        ("Wins / Losses / BE", Cell::new(format!("{} / {} / {}", k.wins, k.losses, k.breakevens))),
        ("Not filled / Setup", Cell::new(format!("{} / {}", k.num_non_filled, k.num_setup))),
        ("Win rate", Cell::new(format!("{:.2}%", k.win_rate))),
        ("Net result", signed_cell(k.net_result, "%")),
        ("Net incl. breakevens", signed_cell(k.active_net_result, "%")),
        ("Gross profit", Cell::new(format!("{:.2}%", k.gross_profit))),
        ("Gross loss", Cell::new(format!("{:.2}%", k.gross_loss))),
        ("Profit factor", Cell::new(format!("{:.2}", k.profit_factor))),
        ("Average win", signed_cell(k.avg_win, "%")),
        ("Average loss", signed_cell(k.avg_loss, "%")),
        ("Expectancy", signed_cell(k.expectancy, "%")),
        ("Average R:R", Cell::new(format!("{:.2}", k.avg_rr_realized))),
        ("Std. deviation", Cell::new(format!("{:.2}", k.std_dev))),
        ("Sharpe ratio", Cell::new(format!("{:.2}", k.sharpe_ratio))),
        ("Trades per week", Cell::new(format!("{:.1}", k.avg_weekly_trades))),
        ("Trading days", Cell::new(k.unique_days)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), value]);
    }
    table
}

fn tag_table(stats: &[TagStat]) -> Table {
    let mut table = new_table(["Name", "Trades", "Wins", "Losses", "BE", "Win rate", "Net"]);
    for stat in stats {
        table.add_row(vec![
            Cell::new(&stat.name),
            Cell::new(stat.total),
            Cell::new(stat.wins),
            Cell::new(stat.losses),
            Cell::new(stat.breakevens),
            Cell::new(format!("{:.1}%", stat.win_rate)),
            signed_cell(stat.net_result, "%"),
        ]);
    }
    table
}

fn calendar_table(month: &CalendarMonth) -> Table {
    let mut table = new_table(WEEKDAY_HEADERS.iter().copied().chain(["Week"]));
    for week in &month.weeks {
        let mut row: Vec<Cell> = week
            .days
            .iter()
            .map(|slot| match slot {
                None => Cell::new(""),
                Some(cell) if cell.trade_count == 0 => Cell::new(cell.day),
                Some(cell) => colored(format!("{}\n{:+.2}", cell.day, cell.net_result), cell.net_result),
            })
            .collect();
        row.push(signed_cell(week.week_pl, "%"));
        table.add_row(row);
    }
    table.add_row(vec![
        Cell::new(format!("Month: {} trades", month.month_trade_count)),
        signed_cell(month.month_pl, "%"),
    ]);
    table
}

fn risk_table(risk: &RiskOfRuin) -> Table {
    let mut table = new_table(["Drawdown", "Probability"]);
    for p in &risk.probabilities {
        let value = if risk.simulated {
            Cell::new(format!("{:.1}%", p.probability))
        } else {
            Cell::new("n/a")
        };
        table.add_row(vec![Cell::new(format!("{:.0}%", p.threshold)), value]);
    }
    table
}

pub fn print_summary(summary: &FilterSummary) {
    let mut table = new_table(["Matches", "Wins", "Losses", "BE", "Win rate", "Avg R:R", "Net"]);
    table.add_row(vec![
        Cell::new(summary.total),
        Cell::new(summary.wins),
        Cell::new(summary.losses),
        Cell::new(summary.breakevens),
        Cell::new(format!("{:.1}%", summary.win_rate)),
        Cell::new(format!("{:.2}", summary.avg_rr)),
        signed_cell(summary.net_profit, "%"),
    ]);
    println!("{table}");
}
