use snafu::ensure;

use crate::errors::{CustomResult, InvalidArgumentSnafu};
use crate::modules::helpers::math::Math;

/// reference speed the speed/conditions adjustment is scaled against
const REFERENCE_SPEED: f64 = 200.0;

/// # fuel strategy calculations
/// the set of calculations used to estimate the fuel use of a vehicle
/// during a race. routes depend on this trait instead of the concrete
/// calculator so a stub can be swapped in when testing.
pub trait FuelCalculationsTrait {
    fn calculate_fuel_per_lap(
        &self,
        fuel_efficiency: f64,
        track_length: f64,
        vehicle_weight: f64,
    ) -> CustomResult<f64>;

    fn adjust_fuel_for_speed_and_conditions(
        &self,
        fuel_per_lap: f64,
        average_speed: f64,
        race_condition_factor: f64,
    ) -> CustomResult<f64>;

    fn calculate_total_fuel(&self, fuel_per_lap: f64, total_laps: i32) -> CustomResult<f64>;

    fn predict_pit_stops(
        &self,
        total_fuel_needed: f64,
        fuel_tank_capacity: f64,
    ) -> CustomResult<i32>;

    fn calculate_fuel_and_pit_stops(
        &self,
        fuel_efficiency: f64,
        track_length: f64,
        total_laps: i32,
        fuel_tank_capacity: f64,
        vehicle_weight: f64,
        average_speed: f64,
        race_condition_factor: f64,
    ) -> CustomResult<(f64, i32)>;
}

pub struct FuelCalculator {}

impl FuelCalculationsTrait for FuelCalculator {
    /// # fuel needed for a single lap
    /// fuel needed to complete one lap of the track, before any
    /// speed/conditions adjustment.
    ///
    /// a vehicle weight of zero or below means the weight is unknown and
    /// the weight modifier is skipped. it is not an error.
    ///
    /// ## Arguments
    /// * `fuel_efficiency` - liters of fuel per lap per unit of track length
    /// * `track_length` - length of the track
    /// * `vehicle_weight` - weight of the vehicle in kg
    ///
    /// ## Returns
    /// * `f64` - liters per lap, rounded to 2 decimals
    fn calculate_fuel_per_lap(
        &self,
        fuel_efficiency: f64,
        track_length: f64,
        vehicle_weight: f64,
    ) -> CustomResult<f64> {
        ensure!(
            fuel_efficiency > 0.0,
            InvalidArgumentSnafu {
                message: "fuel efficiency must be greater than zero",
            }
        );
        ensure!(
            track_length > 0.0,
            InvalidArgumentSnafu {
                message: "track length must be greater than zero",
            }
        );

        let weight_modifier = if vehicle_weight > 0.0 {
            1.0 + (vehicle_weight / 1000.0) * 0.1
        } else {
            1.0
        };

        let base_fuel = track_length / fuel_efficiency;
        Ok(Math::round_float_to_n_decimals(
            base_fuel * weight_modifier,
            2,
        ))
    }

    /// # adjust a per lap figure for speed and track conditions
    /// faster average speeds and worse conditions both burn more fuel.
    fn adjust_fuel_for_speed_and_conditions(
        &self,
        fuel_per_lap: f64,
        average_speed: f64,
        race_condition_factor: f64,
    ) -> CustomResult<f64> {
        ensure!(
            average_speed > 0.0,
            InvalidArgumentSnafu {
                message: "average speed must be greater than zero",
            }
        );
        ensure!(
            race_condition_factor > 0.0,
            InvalidArgumentSnafu {
                message: "race condition factor must be greater than zero",
            }
        );

        Ok(fuel_per_lap * (1.0 + (average_speed / REFERENCE_SPEED) * race_condition_factor))
    }

    /// # total fuel for a race distance
    /// zero laps is allowed and yields zero fuel.
    fn calculate_total_fuel(&self, fuel_per_lap: f64, total_laps: i32) -> CustomResult<f64> {
        ensure!(
            total_laps >= 0,
            InvalidArgumentSnafu {
                message: "total laps cannot be negative",
            }
        );

        Ok(fuel_per_lap * total_laps as f64)
    }

    /// # minimum number of refuel stops
    /// the smallest number of stops that covers the total fuel with the
    /// given tank capacity. needing no fuel means needing no stops.
    fn predict_pit_stops(
        &self,
        total_fuel_needed: f64,
        fuel_tank_capacity: f64,
    ) -> CustomResult<i32> {
        ensure!(
            fuel_tank_capacity > 0.0,
            InvalidArgumentSnafu {
                message: "fuel tank capacity must be greater than zero",
            }
        );
        ensure!(
            total_fuel_needed >= 0.0,
            InvalidArgumentSnafu {
                message: "total fuel needed cannot be negative",
            }
        );

        Ok((total_fuel_needed / fuel_tank_capacity).ceil() as i32)
    }

    /// # full fuel plan for a race
    /// runs the whole pipeline: per lap fuel, speed/conditions adjustment,
    /// race total, pit stops.
    ///
    /// unlike the individual calculations every input has to be strictly
    /// positive here, vehicle weight and lap count included. the checks run
    /// in a fixed order and the first failing one is reported, nothing is
    /// computed past it.
    ///
    /// ## Returns
    /// * `(f64, i32)` - total fuel needed and the pit stops required
    fn calculate_fuel_and_pit_stops(
        &self,
        fuel_efficiency: f64,
        track_length: f64,
        total_laps: i32,
        fuel_tank_capacity: f64,
        vehicle_weight: f64,
        average_speed: f64,
        race_condition_factor: f64,
    ) -> CustomResult<(f64, i32)> {
        ensure!(
            fuel_efficiency > 0.0,
            InvalidArgumentSnafu {
                message: "fuel efficiency must be greater than zero",
            }
        );
        ensure!(
            track_length > 0.0,
            InvalidArgumentSnafu {
                message: "track length must be greater than zero",
            }
        );
        ensure!(
            total_laps > 0,
            InvalidArgumentSnafu {
                message: "total laps must be greater than zero",
            }
        );
        ensure!(
            fuel_tank_capacity > 0.0,
            InvalidArgumentSnafu {
                message: "fuel tank capacity must be greater than zero",
            }
        );
        ensure!(
            vehicle_weight > 0.0,
            InvalidArgumentSnafu {
                message: "vehicle weight must be greater than zero",
            }
        );
        ensure!(
            average_speed > 0.0,
            InvalidArgumentSnafu {
                message: "average speed must be greater than zero",
            }
        );
        ensure!(
            race_condition_factor > 0.0,
            InvalidArgumentSnafu {
                message: "race condition factor must be greater than zero",
            }
        );

        let fuel_per_lap =
            self.calculate_fuel_per_lap(fuel_efficiency, track_length, vehicle_weight)?;
        let fuel_per_lap = self.adjust_fuel_for_speed_and_conditions(
            fuel_per_lap,
            average_speed,
            race_condition_factor,
        )?;
        let total_fuel_needed = self.calculate_total_fuel(fuel_per_lap, total_laps)?;
        let pit_stops_required = self.predict_pit_stops(total_fuel_needed, fuel_tank_capacity)?;

        Ok((total_fuel_needed, pit_stops_required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn error_message<T: std::fmt::Debug>(result: CustomResult<T>) -> String {
        match result {
            Err(Error::InvalidArgumentError { message }) => message,
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
    }

    #[test]
    fn fuel_per_lap_without_weight() {
        let calculator = FuelCalculator {};

        let fuel = calculator.calculate_fuel_per_lap(2.5, 5.5, 0.0).unwrap();
        assert_eq!(fuel, 2.2);
    }

    #[test]
    fn fuel_per_lap_applies_weight_modifier() {
        let calculator = FuelCalculator {};

        // 5.5 / 2.5 = 2.2, modifier 1 + 0.746 * 0.1 = 1.0746 -> 2.36412
        let fuel = calculator.calculate_fuel_per_lap(2.5, 5.5, 746.0).unwrap();
        assert_eq!(fuel, 2.36);
    }

    #[test]
    fn fuel_per_lap_ignores_negative_weight() {
        let calculator = FuelCalculator {};

        let unweighted = calculator.calculate_fuel_per_lap(2.5, 5.5, 0.0).unwrap();
        let negative = calculator.calculate_fuel_per_lap(2.5, 5.5, -50.0).unwrap();
        assert_eq!(unweighted, negative);
    }

    #[test]
    fn fuel_per_lap_rejects_bad_efficiency() {
        let calculator = FuelCalculator {};

        let message = error_message(calculator.calculate_fuel_per_lap(-2.5, 5.5, 0.0));
        assert_eq!(message, "fuel efficiency must be greater than zero");

        let message = error_message(calculator.calculate_fuel_per_lap(0.0, 5.5, 0.0));
        assert_eq!(message, "fuel efficiency must be greater than zero");
    }

    #[test]
    fn fuel_per_lap_rejects_bad_track_length() {
        let calculator = FuelCalculator {};

        let message = error_message(calculator.calculate_fuel_per_lap(2.5, 0.0, 0.0));
        assert_eq!(message, "track length must be greater than zero");
    }

    #[test]
    fn adjustment_scales_with_speed_and_conditions() {
        let calculator = FuelCalculator {};

        // 160 / 200 = 0.8, factor 1.0 -> x1.8
        let adjusted = calculator
            .adjust_fuel_for_speed_and_conditions(2.0, 160.0, 1.0)
            .unwrap();
        assert!((adjusted - 3.6).abs() < 1e-9);

        // at the reference speed with factor 1 the fuel use doubles
        let adjusted = calculator
            .adjust_fuel_for_speed_and_conditions(2.0, 200.0, 1.0)
            .unwrap();
        assert!((adjusted - 4.0).abs() < 1e-9);
    }

    #[test]
    fn adjustment_rejects_bad_inputs() {
        let calculator = FuelCalculator {};

        let message = error_message(calculator.adjust_fuel_for_speed_and_conditions(2.0, 0.0, 1.0));
        assert_eq!(message, "average speed must be greater than zero");

        let message =
            error_message(calculator.adjust_fuel_for_speed_and_conditions(2.0, 160.0, -1.0));
        assert_eq!(message, "race condition factor must be greater than zero");
    }

    #[test]
    fn total_fuel_for_zero_laps_is_zero() {
        let calculator = FuelCalculator {};

        let total = calculator.calculate_total_fuel(2.36, 0).unwrap();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn total_fuel_rejects_negative_laps() {
        let calculator = FuelCalculator {};

        let message = error_message(calculator.calculate_total_fuel(2.36, -1));
        assert_eq!(message, "total laps cannot be negative");
    }

    #[test]
    fn pit_stops_round_up() {
        let calculator = FuelCalculator {};

        assert_eq!(calculator.predict_pit_stops(1000.0, 250.0).unwrap(), 4);
        assert_eq!(calculator.predict_pit_stops(1000.1, 250.0).unwrap(), 5);
    }

    #[test]
    fn no_fuel_needs_no_pit_stops() {
        let calculator = FuelCalculator {};

        assert_eq!(calculator.predict_pit_stops(0.0, 110.0).unwrap(), 0);
    }

    #[test]
    fn pit_stops_reject_bad_inputs() {
        let calculator = FuelCalculator {};

        let message = error_message(calculator.predict_pit_stops(1000.0, 0.0));
        assert_eq!(message, "fuel tank capacity must be greater than zero");

        let message = error_message(calculator.predict_pit_stops(-1.0, 110.0));
        assert_eq!(message, "total fuel needed cannot be negative");
    }

    #[test]
    fn full_plan_matches_the_pipeline() {
        let calculator = FuelCalculator {};

        let (total_fuel, pit_stops) = calculator
            .calculate_fuel_and_pit_stops(2.5, 5.5, 78, 110.0, 746.0, 160.0, 1.0)
            .unwrap();

        let per_lap = calculator.calculate_fuel_per_lap(2.5, 5.5, 746.0).unwrap();
        let adjusted = calculator
            .adjust_fuel_for_speed_and_conditions(per_lap, 160.0, 1.0)
            .unwrap();

        assert!((total_fuel - adjusted * 78.0).abs() < 1e-6);
        assert!((total_fuel - 331.344).abs() < 1e-6);
        assert_eq!(pit_stops, (total_fuel / 110.0).ceil() as i32);
        assert_eq!(pit_stops, 4);
    }

    #[test]
    fn full_plan_is_stricter_than_the_parts() {
        let calculator = FuelCalculator {};

        // zero laps passes calculate_total_fuel on its own but not the
        // composed calculation
        assert!(calculator.calculate_total_fuel(2.2, 0).is_ok());
        let message = error_message(
            calculator.calculate_fuel_and_pit_stops(2.5, 5.5, 0, 110.0, 746.0, 160.0, 1.0),
        );
        assert_eq!(message, "total laps must be greater than zero");

        // same for a missing vehicle weight
        assert!(calculator.calculate_fuel_per_lap(2.5, 5.5, 0.0).is_ok());
        let message = error_message(
            calculator.calculate_fuel_and_pit_stops(2.5, 5.5, 78, 110.0, 0.0, 160.0, 1.0),
        );
        assert_eq!(message, "vehicle weight must be greater than zero");
    }

    #[test]
    fn full_plan_reports_the_first_failing_input() {
        let calculator = FuelCalculator {};

        // everything invalid, fuel efficiency is checked first
        let message = error_message(
            calculator.calculate_fuel_and_pit_stops(0.0, 0.0, 0, 0.0, 0.0, 0.0, 0.0),
        );
        assert_eq!(message, "fuel efficiency must be greater than zero");

        // fuel efficiency valid, track length is next
        let message = error_message(
            calculator.calculate_fuel_and_pit_stops(2.5, 0.0, 0, 0.0, 0.0, 0.0, 0.0),
        );
        assert_eq!(message, "track length must be greater than zero");
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let calculator = FuelCalculator {};

        let first = calculator
            .calculate_fuel_and_pit_stops(2.5, 5.5, 78, 110.0, 746.0, 160.0, 1.0)
            .unwrap();
        let second = calculator
            .calculate_fuel_and_pit_stops(2.5, 5.5, 78, 110.0, 746.0, 160.0, 1.0)
            .unwrap();
        assert_eq!(first, second);
    }

    struct FixedPlanCalculator {}

    impl FuelCalculationsTrait for FixedPlanCalculator {
        fn calculate_fuel_per_lap(&self, _: f64, _: f64, _: f64) -> CustomResult<f64> {
            Ok(1.0)
        }

        fn adjust_fuel_for_speed_and_conditions(
            &self,
            _: f64,
            _: f64,
            _: f64,
        ) -> CustomResult<f64> {
            Ok(1.0)
        }

        fn calculate_total_fuel(&self, _: f64, _: i32) -> CustomResult<f64> {
            Ok(42.0)
        }

        fn predict_pit_stops(&self, _: f64, _: f64) -> CustomResult<i32> {
            Ok(1)
        }

        fn calculate_fuel_and_pit_stops(
            &self,
            _: f64,
            _: f64,
            _: i32,
            _: f64,
            _: f64,
            _: f64,
            _: f64,
        ) -> CustomResult<(f64, i32)> {
            Ok((42.0, 1))
        }
    }

    #[test]
    fn calculators_are_interchangeable_through_the_trait() {
        let calculator: &dyn FuelCalculationsTrait = &FixedPlanCalculator {};

        let (total_fuel, pit_stops) = calculator
            .calculate_fuel_and_pit_stops(2.5, 5.5, 78, 110.0, 746.0, 160.0, 1.0)
            .unwrap();
        assert_eq!(total_fuel, 42.0);
        assert_eq!(pit_stops, 1);
    }
}
