// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridSense.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use super::Scheduler;
use chrono::{DateTime, Utc};
use gridsense_types::{EnergyTask, PriceSeries, ScheduleResult};
use tracing::{debug, info};

/// Costs closer than this are treated as equal, keeping the earlier start
const COST_EPSILON: f64 = 1e-9;

/// Places a task at the start with the lowest total energy cost.
///
/// Candidate starts are the current instant (or the first block, whichever
/// is later) plus every later block start. A candidate is feasible when the
/// whole run is covered by contiguous blocks and ends no later than the
/// deadline. Runs may begin or end part-way through a block; the cost is
/// integrated over the exact overlap with each block.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestWindowScheduler;

impl CheapestWindowScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Cost of running `task` from `start`, or `None` if the forecast does
    /// not cover the whole run
    #[expect(
        clippy::cast_precision_loss,
        reason = "overlaps are at most a few days in seconds"
    )]
    pub fn window_cost(
        task: &EnergyTask,
        prices: &PriceSeries,
        start: DateTime<Utc>,
    ) -> Option<f64> {
        let end = start.checked_add_signed(task.duration()?)?;
        let mut covered_until = start;
        let mut cost = 0.0;

        for block in prices.points() {
            if block.end() <= covered_until {
                continue;
            }
            if block.start >= end {
                break;
            }
            if block.start > covered_until {
                // Gap in the forecast
                return None;
            }

            let segment_end = block.end().min(end);
            let hours = (segment_end - covered_until).num_seconds() as f64 / 3600.0;
            cost += task.power_kw * hours * block.price_per_kwh;
            covered_until = segment_end;

            if covered_until >= end {
                break;
            }
        }

        (covered_until >= end && cost.is_finite()).then_some(cost)
    }

    fn feasible_cost(task: &EnergyTask, prices: &PriceSeries, start: DateTime<Utc>) -> Option<f64> {
        let end = start.checked_add_signed(task.duration()?)?;
        if end > task.deadline {
            return None;
        }
        Self::window_cost(task, prices, start)
    }
}

impl Scheduler for CheapestWindowScheduler {
    fn schedule(
        &self,
        task: &EnergyTask,
        prices: &PriceSeries,
        now: DateTime<Utc>,
    ) -> Option<ScheduleResult> {
        if let Err(e) = task.validate() {
            debug!("Refusing to schedule '{}': {}", task.name, e);
            return None;
        }
        let duration = task.duration()?;
        let earliest = prices.start()?.max(now);

        debug!(
            "Scheduling '{}' ({:.2} kW for {:.2} h, deadline {}) over {} blocks from {}",
            task.name,
            task.power_kw,
            task.duration_hours,
            task.deadline,
            prices.len(),
            earliest
        );

        let candidates = std::iter::once(earliest).chain(
            prices
                .points()
                .iter()
                .map(|block| block.start)
                .filter(|&start| start > earliest),
        );

        let mut best: Option<(DateTime<Utc>, f64)> = None;
        for start in candidates {
            let Some(cost) = Self::feasible_cost(task, prices, start) else {
                continue;
            };

            debug!("  Candidate {}: cost={:.4}", start, cost);

            if best.is_none_or(|(_, best_cost)| cost < best_cost - COST_EPSILON) {
                best = Some((start, cost));
            }
        }

        let Some((start_time, estimated_cost)) = best else {
            debug!("No feasible window for '{}' before {}", task.name, task.deadline);
            return None;
        };

        let cost_if_started_now =
            Self::feasible_cost(task, prices, earliest).unwrap_or(estimated_cost);
        let energy_kwh = task.energy_kwh();

        info!(
            "Scheduled '{}' at {} (cost {:.4}, saves {:.4} vs starting now)",
            task.name,
            start_time,
            estimated_cost,
            cost_if_started_now - estimated_cost
        );

        Some(ScheduleResult {
            task_name: task.name.clone(),
            start_time,
            end_time: start_time.checked_add_signed(duration)?,
            deadline: task.deadline,
            energy_kwh: round_amount(energy_kwh),
            estimated_cost: round_amount(estimated_cost),
            average_price_per_kwh: round_amount(estimated_cost / energy_kwh),
            cost_if_started_now: round_amount(cost_if_started_now),
            savings: round_amount((cost_if_started_now - estimated_cost).max(0.0)),
        })
    }

    fn name(&self) -> &str {
        "cheapest-window"
    }
}

fn round_amount(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use gridsense_types::PricePoint;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 2, 0, 0, 0).unwrap()
    }

    fn hourly(prices: &[f64]) -> PriceSeries {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(base() + Duration::hours(i as i64), 60, price))
            .collect::<Vec<_>>()
            .into()
    }

    fn task(power_kw: f64, duration_hours: f64, deadline_hour: i64) -> EnergyTask {
        EnergyTask {
            name: "washer".to_owned(),
            power_kw,
            duration_hours,
            deadline: base() + Duration::hours(deadline_hour),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_picks_cheapest_window() {
        let prices = hourly(&[0.40, 0.30, 0.10, 0.12, 0.50, 0.45]);
        let result = CheapestWindowScheduler
            .schedule(&task(2.0, 2.0, 6), &prices, base())
            .unwrap();

        assert_eq!(result.start_time, base() + Duration::hours(2));
        assert_eq!(result.end_time, base() + Duration::hours(4));
        assert!(approx(result.energy_kwh, 4.0));
        // 2 kW * (0.10 + 0.12)
        assert!(approx(result.estimated_cost, 0.44));
        assert!(approx(result.average_price_per_kwh, 0.11));
        // 2 kW * (0.40 + 0.30)
        assert!(approx(result.cost_if_started_now, 1.40));
        assert!(approx(result.savings, 0.96));
    }

    #[test]
    fn test_respects_deadline() {
        // Cheapest hours are after the deadline
        let prices = hourly(&[0.30, 0.20, 0.25, 0.05, 0.05]);
        let result = CheapestWindowScheduler
            .schedule(&task(1.0, 1.0, 3), &prices, base())
            .unwrap();

        assert_eq!(result.start_time, base() + Duration::hours(1));
        assert!(result.end_time <= result.deadline);
    }

    #[test]
    fn test_ties_go_to_earliest_start() {
        let prices = hourly(&[0.20, 0.20, 0.20, 0.20]);
        let result = CheapestWindowScheduler
            .schedule(&task(1.0, 1.0, 4), &prices, base())
            .unwrap();

        assert_eq!(result.start_time, base());
        assert!(approx(result.savings, 0.0));
    }

    #[test]
    fn test_fractional_duration() {
        let prices = hourly(&[0.50, 0.10, 0.30, 0.90]);
        let result = CheapestWindowScheduler
            .schedule(&task(4.0, 1.5, 4), &prices, base())
            .unwrap();

        // 1h at 0.10 + 0.5h at 0.30
        assert_eq!(result.start_time, base() + Duration::hours(1));
        assert_eq!(result.end_time, base() + Duration::minutes(150));
        assert!(approx(result.estimated_cost, 4.0 * (0.10 + 0.5 * 0.30)));
    }

    #[test]
    fn test_deadline_too_early_is_infeasible() {
        let prices = hourly(&[0.10, 0.20, 0.30]);

        assert!(
            CheapestWindowScheduler
                .schedule(&task(1.0, 2.0, 1), &prices, base())
                .is_none()
        );
    }

    #[test]
    fn test_task_longer_than_forecast_is_infeasible() {
        let prices = hourly(&[0.10, 0.20, 0.30]);

        assert!(
            CheapestWindowScheduler
                .schedule(&task(1.0, 4.0, 48), &prices, base())
                .is_none()
        );
    }

    #[test]
    fn test_empty_forecast_is_infeasible() {
        assert!(
            CheapestWindowScheduler
                .schedule(&task(1.0, 1.0, 24), &PriceSeries::default(), base())
                .is_none()
        );
    }

    #[test]
    fn test_window_crossing_gap_is_skipped() {
        let prices = PriceSeries::new(vec![
            PricePoint::new(base(), 60, 0.01),
            // 01:00-02:00 missing
            PricePoint::new(base() + Duration::hours(2), 60, 0.40),
            PricePoint::new(base() + Duration::hours(3), 60, 0.40),
        ]);
        let result = CheapestWindowScheduler
            .schedule(&task(1.0, 2.0, 6), &prices, base())
            .unwrap();

        assert_eq!(result.start_time, base() + Duration::hours(2));
        // Starting now would cross the gap
        assert!(approx(result.cost_if_started_now, result.estimated_cost));
    }

    #[test]
    fn test_window_cost_with_quarter_hour_blocks() {
        let prices: PriceSeries = (0..8)
            .map(|i| PricePoint::new(base() + Duration::minutes(15 * i), 15, 0.20))
            .collect::<Vec<_>>()
            .into();

        let cost = CheapestWindowScheduler::window_cost(&task(3.0, 1.0, 24), &prices, base());
        assert!(approx(cost.unwrap(), 0.60));
    }

    #[test]
    fn test_never_starts_before_now() {
        let prices = hourly(&[0.01, 0.50, 0.50]);
        let now = base() + Duration::minutes(30);
        let result = CheapestWindowScheduler
            .schedule(&task(1.0, 0.5, 3), &prices, now)
            .unwrap();

        // The cheap block is already half over, its second half is still usable
        assert_eq!(result.start_time, now);
        assert!(approx(result.estimated_cost, 0.005));
    }

    #[test]
    fn test_mid_hour_now_costs_partial_block() {
        let prices = hourly(&[0.40, 0.30, 0.10, 0.50]);
        let now = base() + Duration::minutes(30);
        let result = CheapestWindowScheduler
            .schedule(&task(2.0, 1.0, 4), &prices, now)
            .unwrap();

        assert_eq!(result.start_time, base() + Duration::hours(2));
        assert!(approx(result.estimated_cost, 0.20));
        // 2 kW * (0.5 h * 0.40 + 0.5 h * 0.30)
        assert!(approx(result.cost_if_started_now, 0.70));
        assert!(approx(result.savings, 0.50));
    }

    #[test]
    fn test_deadline_unreachable_from_now() {
        // 16 minutes left before the deadline, one hour of work
        let prices = hourly(&[0.10, 0.20, 0.30]);
        let now = base() + Duration::minutes(44);

        assert!(
            CheapestWindowScheduler
                .schedule(&task(1.0, 1.0, 1), &prices, now)
                .is_none()
        );
    }

    #[test]
    fn test_now_after_forecast_is_infeasible() {
        let prices = hourly(&[0.10, 0.20]);

        assert!(
            CheapestWindowScheduler
                .schedule(&task(1.0, 0.5, 48), &prices, base() + Duration::hours(3))
                .is_none()
        );
    }

    #[test]
    fn test_future_forecast_starts_at_first_block() {
        let prices = hourly(&[0.10, 0.20]);
        let result = CheapestWindowScheduler
            .schedule(&task(1.0, 1.0, 2), &prices, base() - Duration::hours(5))
            .unwrap();

        assert_eq!(result.start_time, base());
    }

    #[test]
    fn test_extreme_durations_are_infeasible() {
        let prices = hourly(&[0.10; 24]);

        for duration_hours in [1e10, 1e300, 1e-9] {
            assert!(
                CheapestWindowScheduler
                    .schedule(&task(1.0, duration_hours, 24), &prices, base())
                    .is_none()
            );
        }
        assert!(
            CheapestWindowScheduler::window_cost(&task(1.0, 1e300, 24), &prices, base()).is_none()
        );
    }

    #[test]
    fn test_overflowing_cost_is_skipped() {
        let prices = hourly(&[f64::MAX, 0.20]);
        let result = CheapestWindowScheduler
            .schedule(&task(2.0, 1.0, 2), &prices, base())
            .unwrap();

        assert_eq!(result.start_time, base() + Duration::hours(1));
        assert!(result.cost_if_started_now.is_finite());
        assert!(result.average_price_per_kwh.is_finite());
    }
}
