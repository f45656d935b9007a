use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::macros::redis::{clear_cache, delete_keys};
use crate::modules::models::vehicle::Vehicle;
use crate::modules::redis::Redis;
use crate::schema::races;

#[derive(Insertable, AsChangeset, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = races)]
pub struct NewRace {
    pub track_name: String,
    pub track_length: f64,
    pub total_laps: i32,
    pub average_speed: f64,
    pub race_condition_factor: f64,
    pub vehicle_id: i32,
    pub fuel_per_lap: f64,
    pub total_fuel_needed: f64,
    pub pit_stops_required: i32,
}

#[derive(Queryable, Serialize, Identifiable, Associations, PartialEq, Debug, Clone, Deserialize)]
#[diesel(belongs_to(Vehicle, foreign_key = vehicle_id))]
pub struct Race {
    pub id: i32,
    pub track_name: String,
    pub track_length: f64,
    pub total_laps: i32,
    pub average_speed: f64,
    pub race_condition_factor: f64,
    pub vehicle_id: i32,
    pub fuel_per_lap: f64,
    pub total_fuel_needed: f64,
    pub pit_stops_required: i32,
}

impl Race {
    /********** INSERTERS **********/
    /// # insert a new race into the database
    /// the fuel fields on `new_race` are expected to come out of the fuel
    /// calculator, not from the client.
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `new_race` - the race to insert
    ///
    /// ## Returns
    /// * `Race` - the inserted race
    pub fn new(conn: &mut PgConnection, new_race: &NewRace) -> QueryResult<Race> {
        let race = match diesel::insert_into(races::table)
            .values(new_race)
            .get_result::<Race>(conn)
        {
            Ok(race) => race,
            Err(e) => {
                error!(target:"models/race:new", "Error creating race: {}", e);
                return Err(e);
            }
        };

        clear_cache!(race);

        Ok(race)
    }

    /********** GETTERS **********/
    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Race> {
        use crate::schema::races::dsl::*;

        races.filter(id.eq(id_in)).first::<Race>(conn)
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Race>> {
        use crate::schema::races::dsl::*;

        races.order(id).load::<Race>(conn)
    }

    /// # all races driven with the given vehicle
    pub fn get_by_vehicle(conn: &mut PgConnection, vehicle: &Vehicle) -> QueryResult<Vec<Race>> {
        use crate::schema::races::dsl::id;

        Race::belonging_to(vehicle).order(id).load::<Race>(conn)
    }

    /********** UPDATERS **********/
    /// # overwrite a race with new field values
    /// fails with NotFound when the race does not exist.
    pub fn update(conn: &mut PgConnection, id_in: i32, updated: &NewRace) -> QueryResult<Race> {
        use crate::schema::races::dsl::*;

        let race = diesel::update(races.filter(id.eq(id_in)))
            .set(updated)
            .get_result::<Race>(conn)?;

        clear_cache!(race);

        Ok(race)
    }

    /********** DELETERS **********/
    /// # delete the race with the given id
    ///
    /// ## Returns
    /// * `bool` - false when there was nothing to delete
    pub fn delete_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<bool> {
        use crate::schema::races::dsl::*;

        let race = match Race::get_by_id(conn, id_in) {
            Ok(race) => race,
            Err(Error::NotFound) => {
                warn!(target:"models/race:delete_id", "Race {} not found", id_in);
                return Ok(false);
            }
            Err(error) => {
                error!(target:"models/race:delete_id", "Error deleting race: {}", error);
                return Err(error);
            }
        };

        diesel::delete(races.filter(id.eq(race.id))).execute(conn)?;

        clear_cache!(race);

        Ok(true)
    }

    /********** CACHING **********/
    /// drop every cached race response.
    pub fn clear_cache(&self, r_conn: &mut redis::Connection) {
        let keys = match Redis::keys(r_conn, "/api/races*") {
            Ok(keys) => keys,
            Err(error) => {
                error!(target:"models/race:clear_cache", "Error listing race keys: {}", error);
                return;
            }
        };

        delete_keys!(r_conn, keys, "models/race:clear_cache");
    }
}
