use log::{error, warn};
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::errors::{CustomResult, InvalidArgumentSnafu};
use crate::macros::database_error_handler::db_handle_get_error_http;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::fuel_calculator::{FuelCalculationsTrait, FuelCalculator};
use crate::modules::models::general::establish_connection;
use crate::modules::models::race::{NewRace, Race};
use crate::modules::models::vehicle::{sanitize_name, Vehicle};
use crate::modules::redis::Redis;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/***** GETTERS *****/

#[get("/races/all")]
pub fn get_all(origin: &Origin) -> Result<Json<Vec<ApiRace>>, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let all_races =
        db_handle_get_error_http!(Race::get_all(conn), "routes/api/race:get_all", "races");
    let all_vehicles = db_handle_get_error_http!(
        Vehicle::get_all(conn),
        "routes/api/race:get_all",
        "vehicles"
    );

    let api_races = ApiRace::bulk_new(&all_races, &all_vehicles);

    cache_response!(origin, api_races);
}

#[get("/races/<race_id>")]
pub fn get_one(race_id: i32, origin: &Origin) -> Result<Json<ApiRace>, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let race = db_handle_get_error_http!(
        Race::get_by_id(conn, race_id),
        "routes/api/race:get_one",
        "race"
    );
    let vehicle = db_handle_get_error_http!(
        Vehicle::get_by_id(conn, race.vehicle_id),
        "routes/api/race:get_one",
        "vehicle for race"
    );

    cache_response!(origin, ApiRace::new(&race, &vehicle));
}

/// # all races driven with one vehicle
#[get("/races/vehicle/<vehicle_id>")]
pub fn get_by_vehicle(vehicle_id: i32, origin: &Origin) -> Result<Json<Vec<ApiRace>>, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let vehicle = db_handle_get_error_http!(
        Vehicle::get_by_id(conn, vehicle_id),
        "routes/api/race:get_by_vehicle",
        "vehicle"
    );
    let races = db_handle_get_error_http!(
        Race::get_by_vehicle(conn, &vehicle),
        "routes/api/race:get_by_vehicle",
        "races for vehicle"
    );

    let api_races: Vec<ApiRace> = races
        .iter()
        .map(|race| ApiRace::new(race, &vehicle))
        .collect();

    cache_response!(origin, api_races);
}

/***** MODIFY RACES *****/

/// # store a new race
/// runs the fuel calculator against the chosen vehicle and stores its
/// plan alongside the race.
#[post("/races/new", data = "<race>")]
pub fn save_one(race: Json<NewRaceData>) -> Result<Json<ApiRace>, Status> {
    let race = race.into_inner();
    if let Err(error) = race.validate() {
        warn!(target:"routes/api/race:save_one", "Invalid race payload: {}", error);
        return Err(Status::BadRequest);
    }

    let conn = &mut establish_connection();
    let vehicle = match Vehicle::get_by_id(conn, race.vehicle_id) {
        Ok(vehicle) => vehicle,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/api/race:save_one", "Error getting vehicle: {}", error);
            return Err(Status::InternalServerError);
        }
    };

    let new_race = match race.to_new(&vehicle) {
        Ok(new_race) => new_race,
        Err(error) => {
            warn!(target:"routes/api/race:save_one", "Rejected race: {}", error);
            return Err(Status::BadRequest);
        }
    };

    match Race::new(conn, &new_race) {
        Ok(saved) => Ok(Json(ApiRace::new(&saved, &vehicle))),
        Err(error) => {
            error!(target:"routes/api/race:save_one", "Error saving race: {}", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # overwrite a race
/// the fuel plan is recomputed from the submitted values, not from the
/// stored ones.
#[put("/races/<race_id>", data = "<race>")]
pub fn update_one(race_id: i32, race: Json<NewRaceData>) -> Result<Json<ApiRace>, Status> {
    let race = race.into_inner();
    if let Err(error) = race.validate() {
        warn!(target:"routes/api/race:update_one", "Invalid race payload: {}", error);
        return Err(Status::BadRequest);
    }

    let conn = &mut establish_connection();
    let vehicle = match Vehicle::get_by_id(conn, race.vehicle_id) {
        Ok(vehicle) => vehicle,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/api/race:update_one", "Error getting vehicle: {}", error);
            return Err(Status::InternalServerError);
        }
    };

    let new_race = match race.to_new(&vehicle) {
        Ok(new_race) => new_race,
        Err(error) => {
            warn!(target:"routes/api/race:update_one", "Rejected race: {}", error);
            return Err(Status::BadRequest);
        }
    };

    match Race::update(conn, race_id, &new_race) {
        Ok(updated) => Ok(Json(ApiRace::new(&updated, &vehicle))),
        Err(diesel::result::Error::NotFound) => Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/api/race:update_one", "Error updating race: {}", error);
            Err(Status::InternalServerError)
        }
    }
}

#[delete("/races/<race_id>")]
pub fn delete_one(race_id: i32) -> Status {
    let conn = &mut establish_connection();

    match Race::delete_id(conn, race_id) {
        Ok(true) => Status::NoContent,
        Ok(false) => Status::NotFound,
        Err(error) => {
            error!(target:"routes/api/race:delete_one", "Error deleting race: {}", error);
            Status::InternalServerError
        }
    }
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

/// # client payload for creating or updating a race
/// the fuel plan fields are never accepted from the client, they are
/// derived through the fuel calculator.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewRaceData {
    pub track_name: String,
    pub track_length: f64,
    pub total_laps: i32,
    pub average_speed: f64,
    pub race_condition_factor: f64,
    pub vehicle_id: i32,
}

impl NewRaceData {
    /// # range checks for client supplied race fields
    pub fn validate(&self) -> CustomResult<()> {
        ensure!(
            !self.track_name.trim().is_empty(),
            InvalidArgumentSnafu {
                message: "track name must not be empty",
            }
        );
        ensure!(
            sanitize_name(&self.track_name) == self.track_name,
            InvalidArgumentSnafu {
                message: "track name contains invalid characters",
            }
        );
        ensure!(
            (1..=200).contains(&self.total_laps),
            InvalidArgumentSnafu {
                message: "total laps must be between 1 and 200",
            }
        );
        ensure!(
            (1.0..=10_000.0).contains(&self.track_length),
            InvalidArgumentSnafu {
                message: "track length must be between 1 and 10000 km",
            }
        );
        ensure!(
            self.average_speed > 0.0,
            InvalidArgumentSnafu {
                message: "average speed must be greater than zero",
            }
        );
        ensure!(
            (0.1..=5.0).contains(&self.race_condition_factor),
            InvalidArgumentSnafu {
                message: "race condition factor must be between 0.1 and 5.0",
            }
        );
        ensure!(
            self.vehicle_id >= 1,
            InvalidArgumentSnafu {
                message: "vehicle id must be a positive number",
            }
        );

        Ok(())
    }

    /// # turn the payload into an insertable race
    /// runs the full fuel calculation against the given vehicle. fails
    /// with the first violated precondition.
    pub fn to_new(&self, vehicle: &Vehicle) -> CustomResult<NewRace> {
        let calculator = FuelCalculator {};

        let (total_fuel_needed, pit_stops_required) = calculator.calculate_fuel_and_pit_stops(
            vehicle.fuel_efficiency,
            self.track_length,
            self.total_laps,
            vehicle.fuel_tank_capacity,
            vehicle.weight,
            self.average_speed,
            self.race_condition_factor,
        )?;

        Ok(NewRace {
            track_name: self.track_name.clone(),
            track_length: self.track_length,
            total_laps: self.total_laps,
            average_speed: self.average_speed,
            race_condition_factor: self.race_condition_factor,
            vehicle_id: self.vehicle_id,
            fuel_per_lap: total_fuel_needed / self.total_laps as f64,
            total_fuel_needed,
            pit_stops_required,
        })
    }
}

/// # json response for a race
/// embeds the vehicle the plan was calculated for.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiRace {
    pub id: i32,
    pub track_name: String,
    pub track_length: f64,
    pub total_laps: i32,
    pub average_speed: f64,
    pub race_condition_factor: f64,
    pub vehicle: Vehicle,
    pub fuel_per_lap: f64,
    pub total_fuel_needed: f64,
    pub pit_stops_required: i32,
}

impl ApiRace {
    /// we expect the vehicle to be the one the race references.
    pub fn new(race: &Race, vehicle: &Vehicle) -> ApiRace {
        ApiRace {
            id: race.id,
            track_name: race.track_name.clone(),
            track_length: race.track_length,
            total_laps: race.total_laps,
            average_speed: race.average_speed,
            race_condition_factor: race.race_condition_factor,
            vehicle: vehicle.clone(),
            fuel_per_lap: race.fuel_per_lap,
            total_fuel_needed: race.total_fuel_needed,
            pit_stops_required: race.pit_stops_required,
        }
    }

    pub fn bulk_new(all_races: &[Race], all_vehicles: &[Vehicle]) -> Vec<ApiRace> {
        all_races
            .iter()
            .filter_map(|race| {
                let vehicle = all_vehicles.iter().find(|v| v.id == race.vehicle_id)?;
                Some(ApiRace::new(race, vehicle))
            })
            .collect()
    }
}
