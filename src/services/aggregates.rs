//! Derived figures over already-cached record families.
//!
//! Everything here is a pure function of its inputs: no I/O, no clocks, no
//! cache access. The date comparisons in `snapshot_balance` are load-
//! bearing: sales and ledger transactions count strictly *before* the
//! snapshot date, positions count when first bought *on or before* it. The
//! daily and monthly gain percentages are built on those snapshots, so an
//! off-by-one here would skew every rendered gain figure.

use crate::models::{DcaLogEntry, SellLogEntry};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Account value reconstructed as of `at`: configured starting balance,
/// plus profit of all sales strictly before that date, plus signed ledger
/// transactions strictly before that instant, plus current value of all
/// positions first bought on or before it.
pub fn snapshot_balance(
    start_balance: f64,
    at: NaiveDateTime,
    sells: &[SellLogEntry],
    transactions: &[(NaiveDateTime, f64)],
    positions: &[DcaLogEntry],
) -> f64 {
    let mut result = start_balance;

    result += sells
        .iter()
        .filter(|s| s.sold_date.date() < at.date())
        .map(|s| s.profit)
        .sum::<f64>();

    result += transactions
        .iter()
        .filter(|(time, _)| *time < at)
        .map(|(_, amount)| amount)
        .sum::<f64>();

    result += positions
        .iter()
        .filter(|p| p.first_bought_date <= at)
        .map(|p| p.current_value)
        .sum::<f64>();

    result
}

/// Gain percent for one period: `(profit / balance at period start) * 100`,
/// rounded to two decimals. A zero or garbage snapshot balance would produce
/// a non-finite ratio; that is clamped to 0.0 rather than leaking NaN or
/// infinity into rendered output.
fn gain_percent(period_profit: f64, period_start_balance: f64) -> f64 {
    let gain = period_profit / period_start_balance * 100.0;
    if gain.is_finite() {
        (gain * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Date of the earliest recorded sale, if any.
pub fn min_sell_date(sells: &[SellLogEntry]) -> Option<NaiveDate> {
    sells.iter().map(|s| s.sold_date.date()).min()
}

/// Per-day gain percentages from the earliest sale through `today`, newest
/// first.
pub fn daily_gains(
    start_balance: f64,
    sells: &[SellLogEntry],
    transactions: &[(NaiveDateTime, f64)],
    positions: &[DcaLogEntry],
    today: NaiveDate,
) -> Vec<(NaiveDate, f64)> {
    let Some(first_day) = min_sell_date(sells) else {
        return Vec::new();
    };

    let mut gains = Vec::new();
    let mut day = today;
    while day >= first_day {
        let profit: f64 = sells
            .iter()
            .filter(|s| s.sold_date.date() == day)
            .map(|s| s.profit)
            .sum();
        let day_start = day.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let balance = snapshot_balance(start_balance, day_start, sells, transactions, positions);
        gains.push((day, gain_percent(profit, balance)));
        day = day - Duration::days(1);
    }

    gains
}

/// Per-month gain percentages keyed by the first of each month, newest
/// first.
pub fn monthly_gains(
    start_balance: f64,
    sells: &[SellLogEntry],
    transactions: &[(NaiveDateTime, f64)],
    positions: &[DcaLogEntry],
    today: NaiveDate,
) -> Vec<(NaiveDate, f64)> {
    let Some(first_day) = min_sell_date(sells) else {
        return Vec::new();
    };
    let first_month = first_of_month(first_day);

    let mut gains = Vec::new();
    let mut month = first_of_month(today);
    while month >= first_month {
        let profit: f64 = sells
            .iter()
            .filter(|s| {
                s.sold_date.month() == month.month() && s.sold_date.year() == month.year()
            })
            .map(|s| s.profit)
            .sum();
        let month_start = month.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let balance = snapshot_balance(start_balance, month_start, sells, transactions, positions);
        gains.push((month, gain_percent(profit, balance)));
        month = previous_month(month);
    }

    gains
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("first of month is always valid")
}

fn previous_month(first: NaiveDate) -> NaiveDate {
    first_of_month(first - Duration::days(1))
}

/// Per-market profit sums over the sell log, highest first, capped at `max`.
pub fn top_markets(sells: &[SellLogEntry], max: usize) -> Vec<(String, f64)> {
    let mut by_market: HashMap<&str, f64> = HashMap::new();
    for sale in sells {
        *by_market.entry(&sale.market).or_insert(0.0) += sale.profit;
    }

    let mut ranked: Vec<(String, f64)> = by_market
        .into_iter()
        .map(|(market, profit)| (market.to_string(), profit))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(max);
    ranked
}

/// Sum of `amount * current price / max(leverage, 1)` over all positions,
/// plus the free balance.
pub fn total_current_value(positions: &[DcaLogEntry], current_balance: f64) -> f64 {
    let positions_value: f64 = positions
        .iter()
        .map(|p| {
            let leverage = if p.leverage > 1.0 { p.leverage } else { 1.0 };
            p.amount * p.current_price / leverage
        })
        .sum();

    positions_value + current_balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::min_date;

    fn sale(market: &str, profit: f64, sold_date: NaiveDateTime) -> SellLogEntry {
        SellLogEntry {
            market: market.to_string(),
            sold_amount: 1.0,
            bought_times: 1,
            profit_percent: 1.0,
            profit,
            average_buy_price: 1.0,
            total_cost: 1.0,
            sold_price: 1.0,
            sold_date,
        }
    }

    fn position(amount: f64, price: f64, leverage: f64, bought: NaiveDateTime) -> DcaLogEntry {
        DcaLogEntry {
            market: "ADABTC".to_string(),
            amount,
            bought_times: 1,
            profit_percent: 0.0,
            average_buy_price: price,
            total_cost: amount * price,
            current_price: price,
            current_value: amount * price,
            buy_trigger_percent: 0.0,
            current_low_bb_value: 0.0,
            current_high_bb_value: 0.0,
            bb_trigger: 0.0,
            sell_trigger: 0.0,
            perc_change: 0.0,
            leverage,
            buy_strategy: String::new(),
            sell_strategy: String::new(),
            target_gain_value: None,
            first_bought_date: bought,
            buy_strategies: Vec::new(),
            sell_strategies: Vec::new(),
        }
    }

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_snapshot_balance_boundaries() {
        let at = dt(2024, 3, 10, 0);
        // Sale on the snapshot date is excluded (strict before), the earlier
        // one counts.
        let sells = vec![
            sale("A", 5.0, dt(2024, 3, 9, 12)),
            sale("B", 7.0, dt(2024, 3, 10, 1)),
        ];
        // Transaction exactly at the instant is excluded.
        let transactions = vec![(dt(2024, 3, 9, 0), 100.0), (at, 50.0)];
        // Position bought exactly at the instant is included.
        let positions = vec![
            position(2.0, 3.0, 0.0, at),
            position(1.0, 10.0, 0.0, dt(2024, 3, 11, 0)),
        ];

        let balance = snapshot_balance(1000.0, at, &sells, &transactions, &positions);
        assert_eq!(balance, 1000.0 + 5.0 + 100.0 + 6.0);
    }

    #[test]
    fn test_snapshot_balance_is_pure() {
        let at = dt(2024, 3, 10, 0);
        let sells = vec![sale("A", 5.0, dt(2024, 3, 9, 12))];
        let positions = vec![position(2.0, 3.0, 0.0, dt(2024, 3, 1, 0))];

        let first = snapshot_balance(1000.0, at, &sells, &[], &positions);
        let second = snapshot_balance(1000.0, at, &sells, &[], &positions);
        assert_eq!(first, second);
    }

    #[test]
    fn test_daily_gains_rounding_and_order() {
        let sells = vec![
            sale("A", 10.0, dt(2024, 3, 9, 12)),
            sale("B", 5.0, dt(2024, 3, 10, 9)),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let gains = daily_gains(1000.0, &sells, &[], &[], today);
        assert_eq!(gains.len(), 2);
        // Newest first. Day start balance for the 10th includes the 9th's
        // profit.
        assert_eq!(gains[0].0, today);
        assert_eq!(gains[0].1, (5.0_f64 / 1010.0 * 10000.0).round() / 100.0);
        assert_eq!(gains[1].1, 1.0);
    }

    #[test]
    fn test_zero_start_balance_clamps_gain() {
        let sells = vec![sale("A", 10.0, dt(2024, 3, 9, 12))];
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let gains = daily_gains(0.0, &sells, &[], &[], today);
        assert_eq!(gains[0].1, 0.0);
    }

    #[test]
    fn test_monthly_gains_cover_every_month() {
        let sells = vec![
            sale("A", 10.0, dt(2024, 1, 15, 12)),
            sale("B", 20.0, dt(2024, 3, 2, 12)),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let gains = monthly_gains(1000.0, &sells, &[], &[], today);
        assert_eq!(gains.len(), 3);
        assert_eq!(gains[0].0, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(gains[2].0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        // February had no sales: zero profit, not a missing entry.
        assert_eq!(gains[1].1, 0.0);
    }

    #[test]
    fn test_top_markets_ranked_and_capped() {
        let sells = vec![
            sale("ADABTC", 1.0, dt(2024, 3, 9, 1)),
            sale("ETHBTC", 5.0, dt(2024, 3, 9, 2)),
            sale("ADABTC", 2.0, dt(2024, 3, 9, 3)),
            sale("XLMBTC", 0.5, dt(2024, 3, 9, 4)),
        ];

        let top = top_markets(&sells, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("ETHBTC".to_string(), 5.0));
        assert_eq!(top[1], ("ADABTC".to_string(), 3.0));
    }

    #[test]
    fn test_total_current_value_divides_by_leverage() {
        let positions = vec![
            position(10.0, 2.0, 0.0, min_date()),
            position(10.0, 2.0, 4.0, min_date()),
        ];

        // 20 unleveraged + 20/4 leveraged + 100 balance
        assert_eq!(total_current_value(&positions, 100.0), 125.0);
    }
}
