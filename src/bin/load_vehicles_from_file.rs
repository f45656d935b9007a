use dotenvy::dotenv;
use log::{error, info, warn};

use race_strategy_api::errors::Error;
use race_strategy_api::modules::helpers::logging::setup_logging;
use race_strategy_api::modules::helpers::vehicle::VehiclesHelper;
use race_strategy_api::modules::models::general::establish_connection;
use race_strategy_api::modules::models::vehicle::Vehicle;

fn main() {
    dotenv().ok();
    setup_logging().expect("failed to setup logging");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./vehicles.json".to_string());

    // get all the vehicles stored in the file
    let vehicles = match VehiclesHelper::load_vehicles_from_file(&path) {
        Ok(vehicles) => vehicles,
        Err(Error::FileDoesNotExistError { .. }) => {
            error!(target:"load_vehicles_from_file", "File does not exist: {}", path);
            return;
        }
        Err(Error::PermissionDeniedError { .. }) => {
            error!(target:"load_vehicles_from_file", "Permission denied: {}", path);
            return;
        }
        Err(error) => {
            error!(target:"load_vehicles_from_file", "Failed loading vehicles: {}", error);
            return;
        }
    };

    // validate and save them into the database
    let connection = &mut establish_connection();
    for vehicle in vehicles {
        if let Err(error) = vehicle.validate() {
            warn!(target:"load_vehicles_from_file", "skipping invalid vehicle {}: {}", vehicle.name, error);
            continue;
        }

        match Vehicle::exists(connection, &vehicle.name) {
            Ok(true) => {
                info!(target:"load_vehicles_from_file", "vehicle already exists: {}", vehicle.name);
                continue;
            }
            Ok(false) => {}
            Err(error) => {
                error!(target:"load_vehicles_from_file", "failed checking vehicle {}: {}", vehicle.name, error);
                continue;
            }
        }

        match Vehicle::new(connection, &vehicle) {
            Ok(saved) => {
                info!(target:"load_vehicles_from_file", "saved vehicle: {}", saved.name);
            }
            Err(error) => {
                error!(target:"load_vehicles_from_file", "failed saving vehicle {}: {}", vehicle.name, error);
            }
        }
    }
}
