use crate::domain::horizon::HorizonSpec;
use crate::domain::leaderboard::ChangeRecord;
use crate::domain::market::PriceSeries;
use crate::domain::symbol::Symbol;

/// `(live / base - 1) * 100`, or `None` when the base is not strictly positive.
pub fn percentage_change(live: f64, base: f64) -> Option<f64> {
    if base > 0.0 {
        Some((live / base - 1.0) * 100.0)
    } else {
        None
    }
}

/// Change against the close `offset` intervals back. No rounding.
pub fn change_at(live: f64, series: &PriceSeries, offset: usize) -> Option<f64> {
    let base = series.close_back(offset)?;
    percentage_change(live, base)
}

/// One slot per horizon, in the order given.
pub fn changes_by_horizon(
    live: f64,
    series: &PriceSeries,
    horizons: &[HorizonSpec],
) -> Vec<Option<f64>> {
    if !is_usable_price(live) {
        return vec![None; horizons.len()];
    }
    horizons
        .iter()
        .map(|h| change_at(live, series, h.offset))
        .collect()
}

/// Records for every horizon with enough history; an unusable live price yields none.
pub fn compute_changes(
    symbol: &Symbol,
    live: f64,
    series: &PriceSeries,
    horizons: &[HorizonSpec],
) -> Vec<ChangeRecord> {
    changes_by_horizon(live, series, horizons)
        .into_iter()
        .zip(horizons)
        .filter_map(|(pct, h)| {
            pct.map(|pct| ChangeRecord {
                symbol: symbol.clone(),
                horizon: h.name.clone(),
                pct,
            })
        })
        .collect()
}

pub fn is_usable_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizons() -> Vec<HorizonSpec> {
        vec![
            HorizonSpec::new("3D", 72),
            HorizonSpec::new("7D", 168),
            HorizonSpec::new("20D", 480),
        ]
    }

    fn series_with_base(len: usize, base_idx_from_end: usize, base: f64) -> PriceSeries {
        let mut closes = vec![50.0; len];
        closes[len - 1 - base_idx_from_end] = base;
        PriceSeries::from_closes(&closes)
    }

    #[test]
    fn seven_day_change_with_exact_history() {
        let sym = Symbol::from("A_USDT");
        let series = series_with_base(169, 168, 100.0);

        let recs = compute_changes(&sym, 110.0, &series, &horizons());
        let seven: Vec<_> = recs.iter().filter(|r| r.horizon == "7D").collect();
        assert_eq!(seven.len(), 1);
        assert!((seven[0].pct - 10.0).abs() < 1e-9);
        assert!(recs.iter().all(|r| r.horizon != "20D"));
    }

    #[test]
    fn short_history_yields_no_record() {
        let sym = Symbol::from("B_USDT");
        let series = PriceSeries::from_closes(&vec![80.0; 50]);
        assert!(compute_changes(&sym, 90.0, &series, &horizons()).is_empty());
    }

    #[test]
    fn each_horizon_checks_length_independently() {
        let series = PriceSeries::from_closes(&vec![100.0; 73]);
        let out = changes_by_horizon(150.0, &series, &horizons());
        assert_eq!(out.len(), 3);
        assert!((out[0].unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);

        let shorter = PriceSeries::from_closes(&vec![100.0; 72]);
        assert_eq!(changes_by_horizon(150.0, &shorter, &horizons()), vec![None; 3]);
    }

    #[test]
    fn non_positive_base_is_silently_omitted() {
        let series = series_with_base(200, 72, 0.0);
        let out = changes_by_horizon(10.0, &series, &horizons());
        assert_eq!(out[0], None);
        assert!(out[1].is_some());
    }

    #[test]
    fn non_positive_live_price_skips_symbol() {
        let series = PriceSeries::from_closes(&vec![100.0; 500]);
        let sym = Symbol::from("Z_USDT");
        assert!(compute_changes(&sym, 0.0, &series, &horizons()).is_empty());
        assert!(compute_changes(&sym, -1.0, &series, &horizons()).is_empty());
        assert!(compute_changes(&sym, f64::NAN, &series, &horizons()).is_empty());
    }

    #[test]
    fn matches_formula_for_arbitrary_series() {
        let closes: Vec<f64> = (1..=500).map(|i| 1.0 + (i as f64) * 0.37).collect();
        let series = PriceSeries::from_closes(&closes);
        let live = 123.456;
        for h in horizons() {
            let expected = (live / closes[closes.len() - 1 - h.offset] - 1.0) * 100.0;
            let got = change_at(live, &series, h.offset).unwrap();
            assert!((got - expected).abs() < 1e-9, "{}: {got} vs {expected}", h.name);
        }
    }

    #[test]
    fn negative_changes_are_kept() {
        let series = series_with_base(73, 72, 200.0);
        let pct = change_at(100.0, &series, 72).unwrap();
        assert!((pct + 50.0).abs() < 1e-9);
    }
}
