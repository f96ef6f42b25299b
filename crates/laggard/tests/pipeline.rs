//! End-to-end behaviour of the laggard pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use laggard::data::CsvBarStore;
use laggard::eval::cross_section;
use laggard::prelude::*;
use laggard::select::CrossSection;
use laggard::signals::{
    FeatureConfig, IndicatorConfig, LaggedFeatures, MonthlyFeatureRow, MonthlySnapshot,
    compute_daily,
};
use proptest::prelude::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day from `start`, opening at the previous close.
fn series(start: NaiveDate, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let date = start + Duration::days(i as i64);
            Bar::new(date, open, open.max(close) + 1.0, open.min(close) - 1.0, close, 1e6)
        })
        .collect()
}

/// A noisy path with a per-symbol drift and phase.
fn wave(n: usize, drift: f64, phase: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            100.0 + drift * x + ((x + phase) / 11.0).sin() * 6.0 + ((x + phase) / 37.0).cos() * 9.0
        })
        .collect()
}

fn universe(names: &[&str], days: usize) -> BTreeMap<Symbol, Vec<Bar>> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let drift = 0.02 * i as f64 - 0.03;
            ((*name).to_string(), series(day(2019, 1, 1), &wave(days, drift, 13.0 * i as f64)))
        })
        .collect()
}

fn roster(members: &[&str]) -> MembershipRoster {
    MembershipRoster::new(vec![laggard::traits::RosterEntry::new(
        day(2000, 1, 1),
        members.iter().copied(),
    )])
}

/// Picks every symbol of the cross-section.
struct All;

impl Selector for All {
    fn name(&self) -> &str {
        "all"
    }

    fn required_fields(&self) -> BTreeSet<Field> {
        BTreeSet::new()
    }

    fn select(&self, _month: Month, cross_section: &CrossSection) -> Vec<Symbol> {
        cross_section.symbols().cloned().collect()
    }
}

#[test]
fn flat_then_rise_moves_sma_and_roc_12() {
    // 400 days at 100, a linear rise to 150 over 30 days, then flat again.
    let mut closes = vec![100.0; 400];
    closes.extend((1..=30).map(|i| 100.0 + 50.0 * f64::from(i) / 30.0));
    closes.extend(std::iter::repeat_n(150.0, 100));
    let bars = series(day(2020, 1, 1), &closes);
    let rise_start = bars[400].date;
    assert_eq!(rise_start, day(2021, 2, 4));

    let daily = compute_daily(&bars, &IndicatorConfig::default());
    assert_relative_eq!(daily[399].sma.unwrap(), 100.0);

    let table = FeatureTable::build(
        &BTreeMap::from([("AAA".to_string(), bars)]),
        &IndicatorConfig::default(),
        &FeatureConfig::default(),
    );
    let rise_month = Month::from_date(rise_start);
    let before = table.get(rise_month, "AAA").unwrap();
    assert_relative_eq!(before.lagged.roc_12.unwrap(), 0.0);

    let after = table.get(rise_month.next(), "AAA").unwrap();
    assert!(after.lagged.roc_12.unwrap() > 0.0);
    assert!(after.lagged.last_close.unwrap() > after.lagged.sma.unwrap());
}

#[test]
fn non_members_are_never_traded() {
    let bars = universe(&["A", "B", "C", "D"], 500);
    let table = FeatureTable::build(&bars, &IndicatorConfig::default(), &FeatureConfig::default());
    let roster = roster(&["A", "B", "C"]);

    for month in table.months() {
        assert!(table.get(month, "D").is_some());
        let section = cross_section(&table, &roster, month);
        assert!(section.get("D").is_none());
    }

    let result = Backtest::default().run(&table, &roster, &All);
    assert!(result.trades().count() > 0);
    assert!(result.trades().all(|t| t.symbol != "D"));
}

#[test]
fn single_pick_grows_capital_by_its_gain() {
    // January flat at 100; February opens at 100 and closes the month at 110.
    let mut closes = vec![100.0; 31];
    closes.extend((1..=29).map(|i| 100.0 + 10.0 * f64::from(i) / 29.0));
    let bars = series(day(2020, 1, 1), &closes);

    let table = FeatureTable::build(
        &BTreeMap::from([("AAA".to_string(), bars)]),
        &IndicatorConfig::default(),
        &FeatureConfig::default(),
    );
    let config = BacktestConfig {
        months: Some(1),
        ..BacktestConfig::default()
    };
    let result = Backtest::new(config).run(&table, &roster(&["AAA"]), &All);

    let record = &result.records[0];
    assert_eq!(record.month, Month::new(2020, 2).unwrap());
    let ticket = &record.trades[0];
    assert_relative_eq!(ticket.open, 100.0);
    assert_relative_eq!(ticket.close, 110.0, epsilon = 1e-9);
    assert_relative_eq!(ticket.quantity, 100.0);
    assert_relative_eq!(result.final_capital(), 11_000.0, epsilon = 1e-6);
}

#[test]
fn future_bars_do_not_change_a_months_decision() {
    let names = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"];
    let full = universe(&names, 1100);
    let month = Month::new(2021, 6).unwrap();

    let truncated: BTreeMap<Symbol, Vec<Bar>> = full
        .iter()
        .map(|(s, bars)| {
            let kept = bars.iter().filter(|b| b.date < month.first_day()).copied().collect();
            (s.clone(), kept)
        })
        .collect();

    let projected = FeatureConfig {
        project_next_month: true,
        ..FeatureConfig::default()
    };
    let full_table = FeatureTable::build(&full, &IndicatorConfig::default(), &FeatureConfig::default());
    let past_table = FeatureTable::build(&truncated, &IndicatorConfig::default(), &projected);
    assert_eq!(past_table.last_month(), Some(month));

    for name in names {
        let known = full_table.get(month, name).unwrap();
        let guessed = past_table.get(month, name).unwrap();
        assert!(guessed.is_projected());
        assert_eq!(known.lagged, guessed.lagged);
    }

    let roster = roster(&names);
    for variant in Variant::ALL {
        let strategy = SelectionStrategy::from_variant(variant);
        assert_eq!(
            strategy.select(month, &cross_section(&full_table, &roster, month)),
            strategy.select(month, &cross_section(&past_table, &roster, month)),
        );
    }
}

fn write_inputs(dir: &Path, names: &[&str]) -> RunConfig {
    let store = CsvBarStore::new(dir.join("bars"));
    for (symbol, bars) in universe(names, 900) {
        store.write(&symbol, &bars).unwrap();
    }

    // The last name only joins the index in 2020.
    let (late, early) = names.split_last().unwrap();
    let roster_path = dir.join("sp500.csv");
    fs::write(
        &roster_path,
        format!(
            "date,tickers\n2000-01-01,\"{}\"\n2020-03-15,\"{},{}\"\n",
            early.join(","),
            early.join(","),
            late
        ),
    )
    .unwrap();

    let mut config = RunConfig::default();
    config.data.bars_dir = dir.join("bars");
    config.data.roster = roster_path;
    config.data.start = day(2019, 1, 1);
    config.strategy.custom = Some(laggard::select::StrategyConfig {
        cap: 3,
        ..Variant::Classic.config()
    });
    config
}

#[test]
fn file_backed_backtest_is_repeatable_and_point_in_time() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["AAA", "BBB", "CCC", "DDD", "EEE", "NEW"];
    let pipeline = Pipeline::new(write_inputs(dir.path(), &names));

    let prepared = pipeline.prepare(&pipeline.store(), false).unwrap();
    assert_eq!(prepared.roster.len(), 2);

    let first = pipeline.backtest(&prepared);
    let second = pipeline.backtest(&pipeline.prepare(&pipeline.store(), false).unwrap());
    assert_eq!(first, second);

    let joined = Month::new(2020, 4).unwrap();
    for record in &first.records {
        assert!(record.trades.len() <= 3);
        if record.month < joined {
            assert!(record.trades.iter().all(|t| t.symbol != "NEW"));
        }
    }
    assert_relative_eq!(first.records[0].starting_capital, 10_000.0);
}

#[test]
fn screen_ends_with_the_upcoming_month() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["AAA", "BBB", "CCC", "DDD"];
    let pipeline = Pipeline::new(write_inputs(dir.path(), &names));

    let plain = pipeline.prepare(&pipeline.store(), false).unwrap();
    let projected = pipeline.prepare(&pipeline.store(), true).unwrap();
    let upcoming = plain.table.last_month().unwrap().next();

    let screen = pipeline.screen(&projected);
    assert_eq!(screen.len(), pipeline.config().report.screen_months);
    assert_eq!(screen.keys().next_back().copied(), Some(upcoming));
    assert!(screen.values().all(|picks| picks.len() <= 3));
}

#[test]
fn projected_month_in_config_is_not_backtested() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["AAA", "BBB", "CCC", "DDD"];
    let mut config = write_inputs(dir.path(), &names);
    let baseline = Pipeline::new(config.clone());
    let plain = baseline.backtest(&baseline.prepare(&baseline.store(), false).unwrap());

    config.features.project_next_month = true;
    let pipeline = Pipeline::new(config);
    let prepared = pipeline.prepare(&pipeline.store(), false).unwrap();
    let upcoming = prepared.table.last_month().unwrap();
    assert!(prepared.table.month(upcoming).unwrap().values().all(MonthlyFeatureRow::is_projected));

    let result = pipeline.backtest(&prepared);
    assert!(result.records.iter().all(|r| r.month != upcoming));
    assert_eq!(result, plain);
}

fn lagged(values: &[f64]) -> LaggedFeatures {
    let v = |i: usize| Some(values[i % values.len()]);
    LaggedFeatures {
        roc_12: v(0),
        std_12: v(1).map(f64::abs),
        sma: v(2),
        last_close: v(3),
        roc_short: v(4),
        changes_3: v(5),
        changes_6: v(6),
        changes_9: v(7),
        changes_12: v(8),
        pct_3: v(9),
        pct_6: v(10),
        pct_9: v(11),
        pct_12: v(12),
    }
}

fn row(month: Month, symbol: &str, open: f64, close: f64) -> MonthlyFeatureRow {
    MonthlyFeatureRow {
        month,
        symbol: symbol.to_string(),
        snapshot: Some(MonthlySnapshot {
            month,
            symbol: symbol.to_string(),
            date: month.first_day(),
            open,
            close,
            changes: 0.0,
            pct: 0.0,
            sma: None,
            roc_first: None,
            roc_last: None,
            changes_pct: 0.0,
        }),
        lagged: LaggedFeatures::default(),
    }
}

proptest! {
    #[test]
    fn selection_is_capped_and_drawn_from_the_pool(
        pool in prop::collection::vec(prop::collection::vec(-50.0f64..50.0, 13), 0..40),
        cap in 0usize..15,
        variant in prop::sample::select(Variant::ALL.to_vec()),
    ) {
        let section = CrossSection::new(
            pool.iter().enumerate().map(|(i, values)| (format!("S{i:02}"), lagged(values))),
        );
        let strategy = SelectionStrategy::new("prop", laggard::select::StrategyConfig {
            cap,
            ..variant.config()
        });

        let picks = strategy.select(Month::new(2020, 1).unwrap(), &section);
        prop_assert!(picks.len() <= cap);
        let unique: BTreeSet<&Symbol> = picks.iter().collect();
        prop_assert_eq!(unique.len(), picks.len());
        prop_assert!(picks.iter().all(|s| section.get(s).is_some()));
    }

    #[test]
    fn capital_carries_from_month_to_month(
        prices in prop::collection::vec(prop::collection::vec((1.0f64..500.0, 1.0f64..500.0), 0..5), 1..24),
        initial in 100.0f64..1_000_000.0,
    ) {
        let mut month = Month::new(2015, 1).unwrap();
        let mut rows = Vec::new();
        for pairs in &prices {
            for (i, (open, close)) in pairs.iter().enumerate() {
                rows.push(row(month, &format!("S{i}"), *open, *close));
            }
            month = month.next();
        }
        let table = FeatureTable::from_rows(rows);
        let roster = roster(&["S0", "S1", "S2", "S3", "S4"]);
        let config = BacktestConfig { initial_capital: initial, ..BacktestConfig::default() };
        let result = Backtest::new(config).run(&table, &roster, &All);

        let mut capital = initial;
        for record in &result.records {
            prop_assert!((record.starting_capital - capital).abs() < 1e-9);
            let gains: f64 = record.trades.iter().map(|t| t.realized_gain).sum();
            prop_assert!((record.ending_capital - (record.starting_capital + gains)).abs() < 1e-6);
            let spent: f64 = record.trades.iter().map(|t| t.open * t.quantity).sum();
            prop_assert!(spent <= record.starting_capital + 1e-6);
            capital = record.ending_capital;
        }
    }
}
