/// unwrap a database result inside a route handler. a missing row becomes
/// a 404, anything else is logged and becomes a 500.
macro_rules! db_handle_get_error_http {
    ( $data:expr, $target:expr, $type_str:expr) => {
        match $data {
            Ok(e) => e,
            Err(diesel::result::Error::NotFound) => {
                return Err(Status::NotFound);
            }
            Err(error) => {
                error!(target:$target, "Error getting {}. (error: {})", $type_str, error);
                return Err(Status::InternalServerError);
            }
        }
    };
}

pub(crate) use db_handle_get_error_http;
