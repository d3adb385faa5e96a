//! Report formatting utilities for terminal output

use crate::models::Money;
use crate::reports::MonthlyChart;

/// Width of the bars drawn by [`format_chart_bars`]
const BAR_WIDTH: usize = 30;

/// Create a simple bar proportional to `value / max_value`
pub fn format_bar(value: Money, max_value: Money, width: usize) -> String {
    if !max_value.is_positive() || !value.is_positive() {
        return "░".repeat(width);
    }

    let filled = ((value.cents() as f64 / max_value.cents() as f64) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a header line centred in `width` columns
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = width.saturating_sub(len) / 2;
    format!("{}{}\n{}\n", " ".repeat(padding), title, "═".repeat(width))
}

/// Income, expense and projected bars for every month of the chart
pub fn format_chart_bars(chart: &MonthlyChart, currency: &str) -> String {
    let max = chart
        .points
        .iter()
        .flat_map(|p| [p.income, p.expenses, p.projected.unwrap_or_default()])
        .max()
        .unwrap_or_default();

    let mut output = format_header("Income vs. expenses", BAR_WIDTH + 30);
    for point in &chart.points {
        output.push_str(&format!("{}\n", point.label));
        output.push_str(&format!(
            "  in   {} {}\n",
            format_bar(point.income, max, BAR_WIDTH),
            point.income.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "  out  {} {}\n",
            format_bar(point.expenses, max, BAR_WIDTH),
            point.expenses.format_with_symbol(currency)
        ));
        if let Some(projected) = point.projected {
            output.push_str(&format!(
                "  proj {} {}\n",
                format_bar(projected, max, BAR_WIDTH),
                projected.format_with_symbol(currency)
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthPeriod;
    use crate::reports::ChartPoint;

    #[test]
    fn test_format_bar() {
        let bar = format_bar(Money::from_cents(50), Money::from_cents(100), 10);
        assert_eq!(bar, "█████░░░░░");
        assert_eq!(format_bar(Money::zero(), Money::zero(), 4), "░░░░");
    }

    #[test]
    fn test_chart_bars_scale_to_largest_value() {
        let period = MonthPeriod::new(2024, 2).unwrap();
        let chart = MonthlyChart {
            points: vec![ChartPoint {
                period,
                label: period.label(),
                income: Money::from_cents(20000),
                expenses: Money::from_cents(10000),
                projected: Some(Money::zero()),
            }],
        };

        let output = format_chart_bars(&chart, "R$");
        assert!(output.contains("Fev/2024"));
        assert!(output.contains(&format!("in   {} R$ 200.00", "█".repeat(BAR_WIDTH))));
        assert!(output.contains("proj"));
    }
}
