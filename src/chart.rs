//! Data series behind the dashboard charts.
//!
//! Everything here is recomputed from the fund groups on each draw.

use crate::portfolio::FundGroup;

/// Slice colours, cycled by position: blue, teal, amber, orange.
pub const PALETTE: [(u8, u8, u8); 4] = [
    (0x00, 0x88, 0xFE),
    (0x00, 0xC4, 0x9F),
    (0xFF, 0xBB, 0x28),
    (0xFF, 0x80, 0x42),
];

const TICK_LABEL_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RoiPoint<'a> {
    pub fund: &'a str,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSlice<'a> {
    pub name: &'a str,
    pub value: f64,
    pub color_index: usize,
}

/// One ROI point per fund, in group order.
pub fn roi_series<'a>(groups: &[FundGroup<'a>]) -> Vec<RoiPoint<'a>> {
    groups
        .iter()
        .map(|group| RoiPoint {
            fund: group.name,
            roi: group.roi(),
        })
        .collect()
}

/// Current value held per fund.
pub fn allocation_slices<'a>(groups: &[FundGroup<'a>]) -> Vec<AllocationSlice<'a>> {
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| AllocationSlice {
            name: group.name,
            value: group.current_value(),
            color_index: i % PALETTE.len(),
        })
        .collect()
}

/// Axis label for a fund, cut after ten characters.
pub fn tick_label(name: &str) -> String {
    if name.chars().count() > TICK_LABEL_LEN {
        let head: String = name.chars().take(TICK_LABEL_LEN).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Lower and upper y bounds that keep every point and zero on screen.
pub fn roi_bounds(points: &[RoiPoint]) -> [f64; 2] {
    let finite = points.iter().map(|p| p.roi).filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo == hi {
        [lo - 1.0, hi + 1.0]
    } else {
        let pad = (hi - lo) * 0.1;
        [lo - pad, hi + pad]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::group_by_fund;
    use crate::record::InvestmentRecord;

    fn records() -> Vec<InvestmentRecord> {
        ["A", "B", "C", "D", "E", "A"]
            .iter()
            .map(|n| InvestmentRecord::new(n, "100", "10", "1100", "2024-01-01"))
            .collect()
    }

    #[test]
    fn test_roi_series_one_point_per_fund() {
        let records = records();
        let groups = group_by_fund(&records);
        let series = roi_series(&groups);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0].fund, "A");
        assert!((series[0].roi - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_cycles_palette() {
        let records = records();
        let groups = group_by_fund(&records);
        let slices = allocation_slices(&groups);
        assert_eq!(slices[0].value, 2200.0);
        assert_eq!(slices[3].color_index, 3);
        assert_eq!(slices[4].color_index, 0);
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label("Short"), "Short");
        assert_eq!(tick_label("0123456789"), "0123456789");
        assert_eq!(tick_label("Axis Bluechip Fund"), "Axis Bluec...");
    }

    #[test]
    fn test_roi_bounds_include_zero() {
        let points = vec![
            RoiPoint { fund: "A", roi: 5.0 },
            RoiPoint { fund: "B", roi: 15.0 },
            RoiPoint { fund: "C", roi: f64::NAN },
        ];
        let [lo, hi] = roi_bounds(&points);
        assert!(lo < 0.0);
        assert!(hi > 15.0);
        assert_eq!(roi_bounds(&[]), [-1.0, 1.0]);
    }
}
