use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error;
use log::{error, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::errors::{CustomResult, InvalidArgumentSnafu};
use crate::macros::redis::{clear_cache, delete_keys};
use crate::modules::redis::Redis;
use crate::schema::vehicles;

#[derive(Insertable, AsChangeset, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = vehicles)]
pub struct NewVehicle {
    pub name: String,
    pub engine_size: f64,
    pub fuel_efficiency: f64,
    pub fuel_tank_capacity: f64,
    pub weight: f64,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub id: i32,
    pub name: String,
    pub engine_size: f64,
    pub fuel_efficiency: f64,
    pub fuel_tank_capacity: f64,
    pub weight: f64,
}

impl NewVehicle {
    /// # range checks for client supplied vehicle fields
    /// the ranges bound what the fuel calculations are calibrated for.
    pub fn validate(&self) -> CustomResult<()> {
        ensure!(
            !self.name.trim().is_empty(),
            InvalidArgumentSnafu {
                message: "vehicle name must not be empty",
            }
        );
        ensure!(
            sanitize_name(&self.name) == self.name,
            InvalidArgumentSnafu {
                message: "vehicle name contains invalid characters",
            }
        );
        ensure!(
            (1.0..=10.0).contains(&self.engine_size),
            InvalidArgumentSnafu {
                message: "engine size must be between 1.0 and 10.0 liters",
            }
        );
        ensure!(
            (0.1..=100.0).contains(&self.fuel_efficiency),
            InvalidArgumentSnafu {
                message: "fuel efficiency must be between 0.1 and 100.0 liters per lap",
            }
        );
        ensure!(
            (1.0..=200.0).contains(&self.fuel_tank_capacity),
            InvalidArgumentSnafu {
                message: "fuel tank capacity must be between 1 and 200 liters",
            }
        );
        ensure!(
            (100.0..=2000.0).contains(&self.weight),
            InvalidArgumentSnafu {
                message: "vehicle weight must be between 100 kg and 2000 kg",
            }
        );

        Ok(())
    }
}

/// # strip everything that is not allowed in a name
/// vehicle and track names end up in cache keys and log lines so they only
/// keep letters, digits, spaces, dashes and underscores.
pub fn sanitize_name(name: &str) -> String {
    let regex = Regex::new(r"[^A-Za-z0-9 _-]").unwrap();
    regex.replace_all(name, "").to_string()
}

impl Vehicle {
    /********** INSERTERS **********/
    /// # insert a new vehicle into the database
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `new_vehicle` - the vehicle to insert
    ///
    /// ## Returns
    /// * `Vehicle` - the inserted vehicle
    pub fn new(conn: &mut PgConnection, new_vehicle: &NewVehicle) -> QueryResult<Vehicle> {
        let vehicle = match diesel::insert_into(vehicles::table)
            .values(new_vehicle)
            .get_result::<Vehicle>(conn)
        {
            Ok(vehicle) => vehicle,
            Err(e) => {
                error!(target:"models/vehicle:new", "Error creating vehicle: {}", e);
                return Err(e);
            }
        };

        clear_cache!(vehicle);

        Ok(vehicle)
    }

    /********** GETTERS **********/
    /// # check if a vehicle with this name exists
    pub fn exists(conn: &mut PgConnection, name_in: &str) -> QueryResult<bool> {
        use crate::schema::vehicles::dsl::*;
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(vehicles.filter(name.eq(name_in)))).get_result(conn)
    }

    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Vehicle> {
        use crate::schema::vehicles::dsl::*;

        vehicles.filter(id.eq(id_in)).first::<Vehicle>(conn)
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Vehicle>> {
        use crate::schema::vehicles::dsl::*;

        vehicles.order(id).load::<Vehicle>(conn)
    }

    /********** UPDATERS **********/
    /// # overwrite a vehicle with new field values
    /// fails with NotFound when the vehicle does not exist.
    pub fn update(
        conn: &mut PgConnection,
        id_in: i32,
        updated: &NewVehicle,
    ) -> QueryResult<Vehicle> {
        use crate::schema::vehicles::dsl::*;

        let vehicle = diesel::update(vehicles.filter(id.eq(id_in)))
            .set(updated)
            .get_result::<Vehicle>(conn)?;

        clear_cache!(vehicle);

        Ok(vehicle)
    }

    /********** DELETERS **********/
    /// # delete the vehicle with the given id
    /// races referencing the vehicle are dropped by the database cascade.
    ///
    /// ## Returns
    /// * `bool` - false when there was nothing to delete
    pub fn delete_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::vehicles::dsl::*;

        let vehicle = match Vehicle::get_by_id(conn, id_in) {
            Ok(vehicle) => vehicle,
            Err(Error::NotFound) => {
                warn!(target:"models/vehicle:delete_id", "Vehicle {} not found", id_in);
                return Ok(false);
            }
            Err(error) => {
                error!(target:"models/vehicle:delete_id", "Error deleting vehicle: {}", error);
                return Err(error);
            }
        };

        diesel::delete(vehicles.filter(id.eq(vehicle.id))).execute(conn)?;

        clear_cache!(vehicle);

        Ok(true)
    }

    /********** CACHING **********/
    /// drop every cached response that can contain this vehicle. races
    /// embed their vehicle so those go too.
    pub fn clear_cache(&self, r_conn: &mut redis::Connection) {
        let mut keys = match Redis::keys(r_conn, "/api/vehicles*") {
            Ok(keys) => keys,
            Err(error) => {
                error!(target:"models/vehicle:clear_cache", "Error listing vehicle keys: {}", error);
                return;
            }
        };

        match Redis::keys(r_conn, "/api/races*") {
            Ok(race_keys) => keys.extend(race_keys),
            Err(error) => {
                error!(target:"models/vehicle:clear_cache", "Error listing race keys: {}", error);
            }
        }

        delete_keys!(r_conn, keys, "models/vehicle:clear_cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error as CrateError;

    fn valid_vehicle() -> NewVehicle {
        NewVehicle {
            name: "Aston Vantage GT4".to_string(),
            engine_size: 4.0,
            fuel_efficiency: 2.5,
            fuel_tank_capacity: 110.0,
            weight: 1350.0,
        }
    }

    fn validation_message(vehicle: &NewVehicle) -> String {
        match vehicle.validate() {
            Err(CrateError::InvalidArgumentError { message }) => message,
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
    }

    #[test]
    fn a_valid_vehicle_passes_validation() {
        assert!(valid_vehicle().validate().is_ok());
    }

    #[test]
    fn validation_rejects_out_of_range_fields() {
        let mut vehicle = valid_vehicle();
        vehicle.engine_size = 12.0;
        assert_eq!(
            validation_message(&vehicle),
            "engine size must be between 1.0 and 10.0 liters"
        );

        let mut vehicle = valid_vehicle();
        vehicle.fuel_efficiency = 0.0;
        assert_eq!(
            validation_message(&vehicle),
            "fuel efficiency must be between 0.1 and 100.0 liters per lap"
        );

        let mut vehicle = valid_vehicle();
        vehicle.fuel_tank_capacity = 250.0;
        assert_eq!(
            validation_message(&vehicle),
            "fuel tank capacity must be between 1 and 200 liters"
        );

        let mut vehicle = valid_vehicle();
        vehicle.weight = 50.0;
        assert_eq!(
            validation_message(&vehicle),
            "vehicle weight must be between 100 kg and 2000 kg"
        );
    }

    #[test]
    fn validation_rejects_bad_names() {
        let mut vehicle = valid_vehicle();
        vehicle.name = "  ".to_string();
        assert_eq!(validation_message(&vehicle), "vehicle name must not be empty");

        let mut vehicle = valid_vehicle();
        vehicle.name = "GT3 <script>".to_string();
        assert_eq!(
            validation_message(&vehicle),
            "vehicle name contains invalid characters"
        );
    }

    #[test]
    fn sanitize_name_keeps_allowed_characters() {
        assert_eq!(sanitize_name("Silverstone GP"), "Silverstone GP");
        assert_eq!(sanitize_name("MP4-20_test"), "MP4-20_test");
    }

    #[test]
    fn sanitize_name_strips_the_rest() {
        assert_eq!(sanitize_name("Spa; DROP TABLE races--"), "Spa DROP TABLE races--");
        assert_eq!(sanitize_name("a/b\\c<d>"), "abcd");
        assert_eq!(sanitize_name("Zandvoort!"), "Zandvoort");
    }
}
