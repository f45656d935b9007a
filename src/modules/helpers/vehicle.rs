use std::fs;
use std::io::ErrorKind;

use crate::errors::{
    CustomResult, FileDoesNotExistSnafu, FileReadSnafu, InvalidArgumentSnafu,
    PermissionDeniedSnafu,
};
use crate::modules::models::vehicle::NewVehicle;

pub struct VehiclesHelper {}

impl VehiclesHelper {
    /// # load vehicles from a json file
    /// the file holds an array of vehicle payloads in the same shape the
    /// api accepts. entries are not validated here.
    ///
    /// ## Arguments
    /// * `filename` - path of the file to load
    ///
    /// ## Returns
    /// * `Vec<NewVehicle>` - the parsed vehicles
    pub fn load_vehicles_from_file(filename: &str) -> CustomResult<Vec<NewVehicle>> {
        let contents = match fs::read_to_string(filename) {
            Ok(contents) => contents,
            Err(error) => {
                return match error.kind() {
                    ErrorKind::NotFound => FileDoesNotExistSnafu { path: filename }.fail(),
                    ErrorKind::PermissionDenied => PermissionDeniedSnafu { path: filename }.fail(),
                    _ => FileReadSnafu {
                        message: error.to_string(),
                    }
                    .fail(),
                }
            }
        };

        match serde_json::from_str::<Vec<NewVehicle>>(&contents) {
            Ok(vehicles) => Ok(vehicles),
            Err(error) => InvalidArgumentSnafu {
                message: format!("invalid vehicle file: {}", error),
            }
            .fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn a_missing_file_is_reported_as_such() {
        let result = VehiclesHelper::load_vehicles_from_file("./no-such-vehicles.json");
        assert!(matches!(result, Err(Error::FileDoesNotExistError { .. })));
    }
}
