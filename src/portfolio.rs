use crate::chart::allocation_slices;
use crate::record::InvestmentRecord;
use colored::Colorize;
use piechart::{Chart, Color};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Records that share a fund name, in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct FundGroup<'a> {
    pub name: &'a str,
    pub records: Vec<&'a InvestmentRecord>,
}

impl FundGroup<'_> {
    pub fn metrics(&self) -> FundMetrics {
        compute_metrics(self.records.iter().copied())
    }

    pub fn roi(&self) -> f64 {
        compute_roi(self.records.iter().copied())
    }

    pub fn current_value(&self) -> f64 {
        self.records.iter().map(|r| r.current_value()).sum()
    }
}

/// Principal, value and returns over some set of records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnMetrics {
    pub initial_investment: f64,
    pub current_market_value: f64,
    /// Simple return in percent, 0 when nothing was invested.
    pub roi: f64,
    /// Geometric return per 12 records in percent. NaN or infinite when
    /// nothing was invested or there are no records.
    pub annualized_return: f64,
}

pub type FundMetrics = ReturnMetrics;
pub type PortfolioMetrics = ReturnMetrics;

fn roi_of(initial: f64, current: f64) -> f64 {
    if initial != 0.0 {
        (current - initial) / initial * 100.0
    } else {
        0.0
    }
}

pub fn compute_roi<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a InvestmentRecord>,
{
    let mut initial = 0.0;
    let mut current = 0.0;
    for record in records {
        initial += record.invested();
        current += record.current_value();
    }
    roi_of(initial, current)
}

pub fn compute_metrics<'a, I>(records: I) -> ReturnMetrics
where
    I: IntoIterator<Item = &'a InvestmentRecord>,
{
    let mut initial = 0.0;
    let mut current = 0.0;
    let mut count = 0usize;
    for record in records {
        initial += record.invested();
        current += record.current_value();
        count += 1;
    }

    let years = count as f64 / 12.0;
    let annualized_return = ((current / initial).powf(1.0 / years) - 1.0) * 100.0;

    ReturnMetrics {
        initial_investment: initial,
        current_market_value: current,
        roi: roi_of(initial, current),
        annualized_return,
    }
}

/// Group records by fund name. Groups are ordered by first appearance.
pub fn group_by_fund(records: &[InvestmentRecord]) -> Vec<FundGroup<'_>> {
    let mut groups: Vec<FundGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.get_name()) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(record.get_name(), groups.len());
                groups.push(FundGroup {
                    name: record.get_name(),
                    records: vec![record],
                });
            }
        }
    }
    groups
}

/// Two decimal places, exact halves rounded away from zero; non-finite
/// values are spelled out.
pub fn format_fixed(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        match Decimal::from_f64_retain(value) {
            Some(exact) => {
                let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                format!("{rounded:.2}")
            }
            // beyond Decimal range
            None => format!("{value:.2}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    pub records: Vec<InvestmentRecord>,
}

impl Portfolio {
    pub fn new(records: Vec<InvestmentRecord>) -> Portfolio {
        Portfolio { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn group_by_fund(&self) -> Vec<FundGroup<'_>> {
        group_by_fund(&self.records)
    }

    pub fn metrics(&self) -> PortfolioMetrics {
        compute_metrics(&self.records)
    }

    pub fn get_total_value(&self) -> f64 {
        self.records.iter().map(|r| r.current_value()).sum()
    }

    /// Share of current value held in each fund, in percent.
    pub fn get_allocation(&self) -> Vec<(String, f64)> {
        let total = self.get_total_value();
        self.group_by_fund()
            .iter()
            .map(|group| {
                let share = if total > 0.0 {
                    group.current_value() / total * 100.0
                } else {
                    0.0
                };
                (group.name.to_string(), share)
            })
            .collect()
    }

    // Print every fund with its SIP entries as a table
    pub fn print_balances(&self) {
        use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, ContentArrangement, Table};

        for (i, group) in self.group_by_fund().iter().enumerate() {
            println!("{}", format!("Fund {}: {}", i + 1, group.name).bold());

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_width(100);

            table.set_header(vec![
                Cell::new("SIP").add_attribute(Attribute::Bold),
                Cell::new("Start").add_attribute(Attribute::Bold),
                Cell::new("Amount").add_attribute(Attribute::Bold),
                Cell::new("Months").add_attribute(Attribute::Bold),
                Cell::new("Invested").add_attribute(Attribute::Bold),
                Cell::new("Current").add_attribute(Attribute::Bold),
            ]);

            for (j, record) in group.records.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(j + 1),
                    Cell::new(record.get_start_date()),
                    Cell::new(record.get_sip_amount()).set_alignment(CellAlignment::Right),
                    Cell::new(record.get_sip_duration()).set_alignment(CellAlignment::Right),
                    Cell::new(format_fixed(record.invested())).set_alignment(CellAlignment::Right),
                    Cell::new(record.get_current_amount()).set_alignment(CellAlignment::Right),
                ]);
            }

            let metrics = group.metrics();
            table.add_row(vec![
                Cell::new("TOTAL").add_attribute(Attribute::Bold),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(format_fixed(metrics.initial_investment))
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Bold),
                Cell::new(format_fixed(metrics.current_market_value))
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Bold),
            ]);

            println!("{table}");
        }
    }

    // Print return metrics per fund and for the whole portfolio
    pub fn print_performance(&self) {
        use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color as TColor, ContentArrangement, Table};

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120);

        table.set_header(vec![
            Cell::new("Fund").add_attribute(Attribute::Bold),
            Cell::new("SIPs").add_attribute(Attribute::Bold),
            Cell::new("Invested").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
            Cell::new("PnL").add_attribute(Attribute::Bold),
            Cell::new("ROI").add_attribute(Attribute::Bold),
            Cell::new("Annualized").add_attribute(Attribute::Bold),
        ]);

        let colorize_pct = |v: f64| {
            let c = if v >= 0.0 { TColor::Green } else { TColor::Red };
            Cell::new(format!("{}%", format_fixed(v)))
                .set_alignment(CellAlignment::Right)
                .fg(c)
        };
        let colorize_money = |v: f64| {
            let c = if v >= 0.0 { TColor::Green } else { TColor::Red };
            Cell::new(format_fixed(v)).set_alignment(CellAlignment::Right).fg(c)
        };

        for group in self.group_by_fund() {
            let m = group.metrics();
            table.add_row(vec![
                Cell::new(group.name),
                Cell::new(group.records.len()).set_alignment(CellAlignment::Right),
                Cell::new(format_fixed(m.initial_investment)).set_alignment(CellAlignment::Right),
                Cell::new(format_fixed(m.current_market_value)).set_alignment(CellAlignment::Right),
                colorize_money(m.current_market_value - m.initial_investment),
                colorize_pct(m.roi),
                colorize_pct(m.annualized_return),
            ]);
        }

        let m = self.metrics();
        table.add_row(vec![
            Cell::new("TOTAL").add_attribute(Attribute::Bold),
            Cell::new(self.records.len())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
            Cell::new(format_fixed(m.initial_investment))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
            Cell::new(format_fixed(m.current_market_value))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
            colorize_money(m.current_market_value - m.initial_investment).add_attribute(Attribute::Bold),
            colorize_pct(m.roi).add_attribute(Attribute::Bold),
            colorize_pct(m.annualized_return).add_attribute(Attribute::Bold),
        ]);

        println!("{table}");
    }

    // Print the allocation in descending order %-wise
    pub fn print_allocation(&self) {
        let mut allocation = self.get_allocation();
        allocation.sort_by(|a, b| b.1.total_cmp(&a.1));

        println!("====================================");
        for (fund, percentage) in allocation {
            println!("{fund: >30} | {: >10}", format_fixed(percentage));
        }
    }

    pub fn draw_pie_chart(&self) {
        // same order as chart::PALETTE
        let colors = [Color::Blue, Color::Green, Color::Yellow, Color::Red];

        let data: Vec<piechart::Data> = allocation_slices(&self.group_by_fund())
            .into_iter()
            .map(|slice| piechart::Data {
                label: slice.name.to_string(),
                value: slice.value as f32,
                color: Some(colors[slice.color_index].into()),
                fill: '•',
            })
            .collect();

        Chart::new()
            .legend(true)
            .radius(9)
            .aspect_ratio(3)
            .draw(&data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sip(name: &str, amount: &str, months: &str, current: &str) -> InvestmentRecord {
        InvestmentRecord::new(name, amount, months, current, "2024-01-01")
    }

    #[test]
    fn test_empty_portfolio() {
        let portfolio = Portfolio::default();
        assert!(portfolio.group_by_fund().is_empty());
        let m = portfolio.metrics();
        assert_eq!(m.initial_investment, 0.0);
        assert_eq!(m.current_market_value, 0.0);
        assert_eq!(m.roi, 0.0);
        assert!(m.annualized_return.is_nan());
    }

    #[test]
    fn test_zero_principal_roi_is_zero() {
        let records = vec![sip("A", "0", "6", "5000")];
        let groups = group_by_fund(&records);
        let m = groups[0].metrics();
        assert_eq!(m.roi, 0.0);
        assert_eq!(groups[0].roi(), 0.0);
        assert!(m.annualized_return.is_infinite());
    }

    #[test]
    fn test_two_records_one_fund() {
        let records = vec![sip("A", "1000", "6", "6000"), sip("A", "1000", "6", "7000")];
        let groups = group_by_fund(&records);
        assert_eq!(groups.len(), 1);
        let m = groups[0].metrics();
        assert_eq!(m.initial_investment, 12000.0);
        assert_eq!(m.current_market_value, 13000.0);
        assert_eq!(format_fixed(m.roi), "8.33");
        // 2 records => exponent 6
        let expected = ((13000.0_f64 / 12000.0).powf(6.0) - 1.0) * 100.0;
        assert!((m.annualized_return - expected).abs() < 1e-9);
    }

    #[test]
    fn test_twelve_records_annualized_equals_roi() {
        let records: Vec<_> = (0..12).map(|_| sip("A", "100", "1", "110")).collect();
        let m = compute_metrics(&records);
        assert!((m.annualized_return - m.roi).abs() < 1e-9);
        assert!((m.roi - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_by_fund_preserves_order_and_count() {
        let records = vec![
            sip("B", "1", "1", "1"),
            sip("A", "2", "1", "2"),
            sip("B", "3", "1", "3"),
            sip("C", "4", "1", "4"),
            sip("A", "5", "1", "5"),
        ];
        let groups = group_by_fund(&records);
        let names: Vec<&str> = groups.iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        let b_amounts: Vec<&str> = groups[0].records.iter().map(|r| r.get_sip_amount()).collect();
        assert_eq!(b_amounts, vec!["1", "3"]);
        let total: usize = groups.iter().map(|g| g.records.len()).sum();
        assert_eq!(total, records.len());
        assert!(groups.iter().all(|g| !g.records.is_empty()));
    }

    #[test]
    fn test_portfolio_metrics_span_all_funds() {
        let portfolio = Portfolio::new(vec![
            sip("A", "1000", "6", "6600"),
            sip("B", "500", "12", "5400"),
        ]);
        let m = portfolio.metrics();
        assert_eq!(m.initial_investment, 12000.0);
        assert_eq!(m.current_market_value, 12000.0);
        assert_eq!(m.roi, 0.0);
    }

    #[test]
    fn test_malformed_numbers_degrade_to_zero() {
        let records = vec![sip("A", "1000", "six", "6000")];
        let m = compute_metrics(&records);
        assert_eq!(m.initial_investment, 0.0);
        assert_eq!(m.roi, 0.0);
        assert_eq!(format_fixed(m.annualized_return), "Infinity");
    }

    #[test]
    fn test_allocation_sums_to_hundred() {
        let portfolio = Portfolio::new(vec![
            sip("A", "1000", "6", "3000"),
            sip("B", "1000", "6", "1000"),
            sip("A", "1000", "6", "4000"),
        ]);
        let allocation = portfolio.get_allocation();
        assert_eq!(allocation[0], ("A".to_string(), 87.5));
        assert_eq!(allocation[1], ("B".to_string(), 12.5));
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(8.3333), "8.33");
        assert_eq!(format_fixed(f64::NAN), "NaN");
        assert_eq!(format_fixed(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_fixed_rounds_exact_halves_up() {
        assert_eq!(format_fixed(1000.125), "1000.13");
        assert_eq!(format_fixed(0.125), "0.13");
        assert_eq!(format_fixed(-1000.125), "-1000.13");
        // 2.675 and 1.005 sit just below the half in binary
        assert_eq!(format_fixed(2.675), "2.67");
        assert_eq!(format_fixed(1.005), "1.00");
        assert_eq!(format_fixed(1e30), format!("{:.2}", 1e30));
    }
}
