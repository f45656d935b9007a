use log::{error, warn};
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};

use crate::errors::AlreadyExistsSnafu;
use crate::macros::database_error_handler::db_handle_get_error_http;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::models::general::establish_connection;
use crate::modules::models::vehicle::{NewVehicle, Vehicle};
use crate::modules::redis::Redis;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/***** GETTERS *****/

#[get("/vehicles/all")]
pub fn get_all(origin: &Origin) -> Result<Json<Vec<Vehicle>>, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let all_vehicles = db_handle_get_error_http!(
        Vehicle::get_all(conn),
        "routes/api/vehicle:get_all",
        "vehicles"
    );

    cache_response!(origin, all_vehicles);
}

#[get("/vehicles/<vehicle_id>")]
pub fn get_one(vehicle_id: i32, origin: &Origin) -> Result<Json<Vehicle>, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let vehicle = db_handle_get_error_http!(
        Vehicle::get_by_id(conn, vehicle_id),
        "routes/api/vehicle:get_one",
        "vehicle"
    );

    cache_response!(origin, vehicle);
}

/***** MODIFY VEHICLES *****/

/// # store a new vehicle
/// duplicate names are rejected, the loader and the ui both treat the
/// name as the vehicle's handle.
#[post("/vehicles/new", data = "<vehicle>")]
pub fn save_one(vehicle: Json<NewVehicle>) -> Result<Json<Vehicle>, Status> {
    let vehicle = vehicle.into_inner();
    if let Err(error) = vehicle.validate() {
        warn!(target:"routes/api/vehicle:save_one", "Invalid vehicle payload: {}", error);
        return Err(Status::BadRequest);
    }

    let conn = &mut establish_connection();

    match Vehicle::exists(conn, &vehicle.name) {
        Ok(false) => {}
        Ok(true) => {
            let error = AlreadyExistsSnafu {
                name: vehicle.name.clone(),
            }
            .build();
            warn!(target:"routes/api/vehicle:save_one", "{}", error);
            return Err(Status::Conflict);
        }
        Err(error) => {
            error!(target:"routes/api/vehicle:save_one", "Error checking vehicle name: {}", error);
            return Err(Status::InternalServerError);
        }
    }

    match Vehicle::new(conn, &vehicle) {
        Ok(saved) => Ok(Json(saved)),
        Err(error) => {
            error!(target:"routes/api/vehicle:save_one", "Error saving vehicle: {}", error);
            Err(Status::InternalServerError)
        }
    }
}

#[put("/vehicles/<vehicle_id>", data = "<vehicle>")]
pub fn update_one(vehicle_id: i32, vehicle: Json<NewVehicle>) -> Result<Json<Vehicle>, Status> {
    let vehicle = vehicle.into_inner();
    if let Err(error) = vehicle.validate() {
        warn!(target:"routes/api/vehicle:update_one", "Invalid vehicle payload: {}", error);
        return Err(Status::BadRequest);
    }

    let conn = &mut establish_connection();
    match Vehicle::update(conn, vehicle_id, &vehicle) {
        Ok(updated) => Ok(Json(updated)),
        Err(diesel::result::Error::NotFound) => Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/api/vehicle:update_one", "Error updating vehicle: {}", error);
            Err(Status::InternalServerError)
        }
    }
}

#[delete("/vehicles/<vehicle_id>")]
pub fn delete_one(vehicle_id: i32) -> Status {
    let conn = &mut establish_connection();

    match Vehicle::delete_id(conn, vehicle_id) {
        Ok(true) => Status::NoContent,
        Ok(false) => Status::NotFound,
        Err(error) => {
            error!(target:"routes/api/vehicle:delete_one", "Error deleting vehicle: {}", error);
            Status::InternalServerError
        }
    }
}
