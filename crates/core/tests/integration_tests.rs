// ═══════════════════════════════════════════════════════════════════
// Integration Tests — CalculationView, listeners, TradeProfitCalculator
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, NaiveDate};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use trade_profit_core::errors::CoreError;
use trade_profit_core::models::calculation::{Outcome, ViewChange, ViewUpdate};
use trade_profit_core::models::price::PriceRecord;
use trade_profit_core::models::price_table::PriceTable;
use trade_profit_core::models::settings::Settings;
use trade_profit_core::view::calculation_view::CalculationView;
use trade_profit_core::view::traits::ViewListener;
use trade_profit_core::TradeProfitCalculator;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// BTC with two prices plus ETH with 20 consecutive daily prices
/// (2016-03-01 ..= 2016-03-20, price 10 + day offset).
fn table() -> PriceTable {
    let mut records = vec![
        PriceRecord::new("BTC", d(2013, 4, 29), 100.0),
        PriceRecord::new("BTC", d(2013, 5, 13), 120.0),
    ];
    records.extend((0..20).map(|i| {
        PriceRecord::new("ETH", d(2016, 3, 1) + Duration::days(i), 10.0 + i as f64)
    }));
    PriceTable::from_records(records).unwrap()
}

/// Collects every update it receives.
#[derive(Default, Clone)]
struct Recorder {
    updates: Rc<RefCell<Vec<ViewUpdate>>>,
}

impl ViewListener for Recorder {
    fn on_update(&mut self, update: &ViewUpdate) {
        self.updates.borrow_mut().push(update.clone());
    }
}

// ═══════════════════════════════════════════════════════════════════
// CalculationView
// ═══════════════════════════════════════════════════════════════════

mod calculation_view {
    use super::*;

    #[test]
    fn opens_on_first_symbol() {
        let t = table();
        let view = CalculationView::new(&t, &Settings::default()).unwrap();
        assert_eq!(view.selection().symbol, "BTC");
        assert_eq!(view.selection().quantity, 1);
        assert_eq!(view.display().selected, "Selected: BTC");
    }

    #[test]
    fn initial_state_for_small_symbol() {
        let t = table();
        let view = CalculationView::with_symbol(&t, &Settings::default(), "BTC").unwrap();
        let sel = view.selection();
        assert_eq!(sel.buy_date, d(2013, 4, 29));
        // fewer than 15 dates: default sell date clamps to the earliest date
        assert_eq!(sel.sell_date, d(2013, 4, 29));
        assert_eq!(view.buy_bounds().earliest, d(2013, 4, 29));
        assert_eq!(view.buy_bounds().latest, d(2013, 5, 13));
        assert_eq!(view.sell_bounds().earliest, d(2013, 4, 29));
        assert!(view.has_data());
        assert_eq!(view.display().profit, "Profit: 0.00 $");
    }

    #[test]
    fn symbol_change_resets_bounds_dates_and_chart() {
        let t = table();
        let mut view = CalculationView::new(&t, &Settings::default()).unwrap();
        let update = view.select_symbol("ETH").unwrap();

        assert_eq!(update.change, ViewChange::Symbol);
        assert_eq!(update.selection.buy_date, d(2016, 3, 1));
        // 20 dates, 15th from the end is 2016-03-06
        assert_eq!(update.selection.sell_date, d(2016, 3, 6));
        assert_eq!(update.buy_bounds.earliest, d(2016, 3, 1));
        assert_eq!(update.buy_bounds.latest, d(2016, 3, 20));
        assert_eq!(update.sell_bounds.earliest, d(2016, 3, 1));
        assert_eq!(update.sell_bounds.latest, d(2016, 3, 20));
        assert_eq!(update.display.selected, "Selected: ETH");

        let chart = update.chart.expect("symbol change regenerates the chart");
        assert_eq!(chart.symbol, "ETH");
        assert_eq!(chart.len(), 20);
        assert!(chart.points.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(view.chart(), &chart);

        let result = update.outcome.result().copied().unwrap();
        assert_eq!(result.cost, 10.0);
        assert_eq!(result.proceeds, 15.0);
    }

    #[test]
    fn unknown_symbol_leaves_state_untouched() {
        let t = table();
        let mut view = CalculationView::new(&t, &Settings::default()).unwrap();
        let before = view.selection().clone();
        let err = view.select_symbol("DOGE").unwrap_err();
        assert!(matches!(err, CoreError::UnknownSymbol(_)));
        assert_eq!(view.selection(), &before);
    }

    #[test]
    fn btc_scenario_through_view() {
        let t = table();
        let mut view = CalculationView::with_symbol(&t, &Settings::default(), "BTC").unwrap();
        view.select_buy_date(d(2013, 4, 29)).unwrap();
        view.select_sell_date(d(2013, 5, 13)).unwrap();
        let update = view.set_quantity(10).unwrap();

        assert_eq!(update.change, ViewChange::Quantity);
        assert_eq!(update.display.purchased, "Purchased: 1000.00");
        assert_eq!(update.display.sold, "Sold: 1200.00");
        assert_eq!(update.display.profit, "Profit: 200.00 $");
        assert_eq!(update.display.status, None);
    }

    #[test]
    fn buy_date_narrows_sell_lower_bound() {
        let t = table();
        let mut view = CalculationView::with_symbol(&t, &Settings::default(), "ETH").unwrap();
        view.select_sell_date(d(2016, 3, 5)).unwrap();

        let update = view.select_buy_date(d(2016, 3, 10)).unwrap();
        assert_eq!(update.change, ViewChange::BuyDate);
        assert_eq!(update.sell_bounds.earliest, d(2016, 3, 10));
        assert_eq!(update.sell_bounds.latest, d(2016, 3, 20));
        // the old sell date now precedes the purchase and is moved up
        assert_eq!(update.selection.sell_date, d(2016, 3, 10));
        assert!(update.selection.sell_date >= update.selection.buy_date);
    }

    #[test]
    fn sell_date_before_buy_date_is_clamped() {
        let t = table();
        let mut view = CalculationView::with_symbol(&t, &Settings::default(), "ETH").unwrap();
        view.select_buy_date(d(2016, 3, 10)).unwrap();
        let update = view.select_sell_date(d(2016, 3, 2)).unwrap();
        assert_eq!(update.selection.sell_date, d(2016, 3, 10));
        assert_eq!(update.sell_bounds.earliest, d(2016, 3, 10));
    }

    #[test]
    fn sell_date_does_not_change_bounds() {
        let t = table();
        let mut view = CalculationView::with_symbol(&t, &Settings::default(), "ETH").unwrap();
        let before = (view.buy_bounds(), view.sell_bounds());
        view.select_sell_date(d(2016, 3, 18)).unwrap();
        assert_eq!((view.buy_bounds(), view.sell_bounds()), before);
    }

    #[test]
    fn dates_outside_range_are_clamped() {
        let t = table();
        let mut view = CalculationView::with_symbol(&t, &Settings::default(), "ETH").unwrap();
        let update = view.select_buy_date(d(2010, 1, 1)).unwrap();
        assert_eq!(update.selection.buy_date, d(2016, 3, 1));
        let update = view.select_sell_date(d(2030, 1, 1)).unwrap();
        assert_eq!(update.selection.sell_date, d(2016, 3, 20));
    }

    #[test]
    fn quantity_clamped_to_range() {
        let t = table();
        let mut view = CalculationView::new(&t, &Settings::default()).unwrap();
        assert_eq!(view.set_quantity(0).unwrap().selection.quantity, 1);
        assert_eq!(
            view.set_quantity(5_000_000).unwrap().selection.quantity,
            1_000_000
        );
        assert_eq!(view.set_quantity(250).unwrap().selection.quantity, 250);
    }

    #[test]
    fn no_data_keeps_previous_totals() {
        let t = table();
        let mut view = CalculationView::with_symbol(&t, &Settings::default(), "BTC").unwrap();
        view.select_sell_date(d(2013, 5, 13)).unwrap();
        view.set_quantity(10).unwrap();
        let shown = view.display().clone();

        let update = view.select_sell_date(d(2013, 5, 1)).unwrap();
        assert_eq!(update.outcome, Outcome::NoData { missing: d(2013, 5, 1) });
        assert!(!view.has_data());
        assert_eq!(update.display.status.as_deref(), Some("no data"));
        assert_eq!(update.display.purchased, shown.purchased);
        assert_eq!(update.display.sold, shown.sold);
        assert_eq!(update.display.profit, shown.profit);
        assert_eq!(view.last_result().unwrap().proceeds, 1200.0);

        // a valid selection clears the placeholder
        let update = view.select_sell_date(d(2013, 5, 13)).unwrap();
        assert!(matches!(update.outcome, Outcome::Ready(_)));
        assert_eq!(update.display.status, None);
    }

    #[test]
    fn recompute_is_repeatable() {
        let t = table();
        let mut view = CalculationView::with_symbol(&t, &Settings::default(), "ETH").unwrap();
        let a = view.set_quantity(3).unwrap();
        let b = view.set_quantity(3).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.display, b.display);
    }

    #[test]
    fn custom_settings() {
        let t = table();
        let settings = Settings {
            sell_offset: 1,
            precision: 3,
            max_quantity: 50,
            ..Settings::default()
        };
        let mut view = CalculationView::with_symbol(&t, &settings, "ETH").unwrap();
        assert_eq!(view.selection().sell_date, d(2016, 3, 20));
        let update = view.set_quantity(100).unwrap();
        assert_eq!(update.selection.quantity, 50);
        assert_eq!(update.display.purchased, "Purchased: 500.000");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Listeners
// ═══════════════════════════════════════════════════════════════════

mod listeners {
    use super::*;

    #[test]
    fn every_setter_notifies() {
        let t = table();
        let recorder = Recorder::default();
        let mut view = CalculationView::new(&t, &Settings::default()).unwrap();
        view.subscribe(recorder.clone());
        assert_eq!(view.listener_count(), 1);

        view.select_symbol("ETH").unwrap();
        view.select_buy_date(d(2016, 3, 2)).unwrap();
        view.select_sell_date(d(2016, 3, 9)).unwrap();
        view.set_quantity(4).unwrap();

        let updates = recorder.updates.borrow();
        let changes: Vec<_> = updates.iter().map(|u| u.change).collect();
        assert_eq!(
            changes,
            vec![
                ViewChange::Symbol,
                ViewChange::BuyDate,
                ViewChange::SellDate,
                ViewChange::Quantity
            ]
        );
        assert!(updates[0].chart.is_some());
        assert!(updates[1..].iter().all(|u| u.chart.is_none()));

        let last = updates[3].outcome.result().unwrap();
        assert_eq!(last.cost, 44.0);
        assert_eq!(last.proceeds, 72.0);
        assert_eq!(last.profit, 28.0);
    }

    #[test]
    fn closures_are_listeners() {
        let t = table();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut view = CalculationView::new(&t, &Settings::default()).unwrap();
        view.subscribe(move |update: &ViewUpdate| {
            sink.borrow_mut().push(update.selection.quantity);
        });
        view.set_quantity(2).unwrap();
        view.set_quantity(3).unwrap();

        assert_eq!(*seen.borrow(), vec![2, 3]);
    }

    #[test]
    fn failed_update_does_not_notify() {
        let t = table();
        let recorder = Recorder::default();
        let mut view = CalculationView::new(&t, &Settings::default()).unwrap();
        view.subscribe(recorder.clone());
        assert!(view.select_symbol("DOGE").is_err());
        assert!(recorder.updates.borrow().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// TradeProfitCalculator facade
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    const CSV: &str = "\
date,open,high,low,close,volume,Name
2013-04-29,0,0,0,100.0,0,BTC
2013-05-13,0,0,0,120.0,0,BTC
2013-05-14,0,0,0,oops,0,BTC
2013-02-08,15.07,15.12,14.63,14.75,8407500,AAL
";

    #[test]
    fn load_from_bytes_end_to_end() {
        let calc = TradeProfitCalculator::load_from_bytes(CSV.as_bytes(), Settings::default())
            .unwrap();
        assert_eq!(calc.symbols(), vec!["AAL", "BTC"]);
        assert_eq!(calc.report().skipped_count(), 1);
        assert_eq!(
            calc.date_range("BTC").unwrap(),
            (d(2013, 4, 29), d(2013, 5, 13))
        );

        let r = calc.compute("BTC", d(2013, 4, 29), d(2013, 5, 13), 10).unwrap();
        let text = calc.display_text("BTC", &r);
        assert_eq!(text.purchased, "Purchased: 1000.00");
        assert_eq!(text.sold, "Sold: 1200.00");
        assert_eq!(text.profit, "Profit: 200.00 $");
    }

    #[test]
    fn load_from_file_end_to_end() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        file.flush().unwrap();

        let calc = TradeProfitCalculator::load_from_file(file.path(), Settings::default()).unwrap();
        assert!(matches!(
            calc.price_at("BTC", d(2013, 5, 1)),
            Err(CoreError::NoPriceForDate { .. })
        ));
        assert_eq!(calc.default_buy_date("AAL").unwrap(), d(2013, 2, 8));
        assert_eq!(calc.default_sell_date("AAL").unwrap(), d(2013, 2, 8));
    }

    #[test]
    fn invalid_settings_rejected_before_loading() {
        let settings = Settings {
            sell_offset: 0,
            ..Settings::default()
        };
        let err = TradeProfitCalculator::load_from_bytes(CSV.as_bytes(), settings).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn empty_dataset_is_fatal() {
        let err = TradeProfitCalculator::load_from_bytes(
            b"date,open,high,low,close,volume,Name\n2013-01-01,0,0,0,x,0,BTC\n",
            Settings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EmptyDataset));
    }

    #[test]
    fn views_borrow_the_table() {
        let calc = TradeProfitCalculator::from_table(table(), Settings::default());
        let mut first = calc.view().unwrap();
        let mut second = calc.view_for("ETH").unwrap();
        first.set_quantity(2).unwrap();
        second.set_quantity(3).unwrap();
        assert_eq!(first.selection().symbol, "BTC");
        assert_eq!(second.selection().quantity, 3);
    }

    #[test]
    fn chart_queries() {
        let calc = TradeProfitCalculator::from_table(table(), Settings::default());
        let full = calc.price_history("ETH").unwrap();
        assert_eq!(full.len(), 20);
        let part = calc
            .price_history_between("ETH", d(2016, 3, 5), d(2016, 3, 7))
            .unwrap();
        assert_eq!(part.len(), 3);
        assert_eq!(part.min_price(), Some(14.0));
        assert_eq!(part.max_price(), Some(16.0));
    }

    #[test]
    fn debug_summary() {
        let calc = TradeProfitCalculator::from_table(table(), Settings::default());
        let debug = format!("{calc:?}");
        assert!(debug.contains("TradeProfitCalculator"));
        assert!(debug.contains("symbols: 2"));
        assert!(debug.contains("prices: 22"));
    }
}
