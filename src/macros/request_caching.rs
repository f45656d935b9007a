/// check if a request is in the cache, if it is, return it.
/// else follow the normal flow
///
/// does nothing when debug enabled
macro_rules! read_cache_request {
    ( $origin:expr ) => {
        if !cfg!(debug_assertions) {
            let uri = $origin.path().to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    if Redis::has_data::<String>(r_conn, uri.clone()).unwrap_or(false) {
                        match Redis::get_data::<String, String>(r_conn, uri) {
                            Ok(data) => match serde_json::from_str(&data) {
                                Ok(cached) => return Ok(Json(cached)),
                                Err(error) => {
                                    error!(target:"macros/request_caching", "Error parsing cached response: {}", error);
                                }
                            },
                            Err(error) => {
                                error!(target:"macros/request_caching", "Error reading cached response: {}", error);
                            }
                        }
                    }
                }
                Err(error) => {
                    error!(target:"macros/request_caching", "Error connecting to redis: {}", error);
                    return Err(Status::InternalServerError);
                }
            }
        }
    };
}

/// add the response to the request to the cache and then return it.
///
/// if debug is enabled we wont add to cache.
macro_rules! cache_response {
    ( $origin:expr, $data:expr ) => {
        if !cfg!(debug_assertions) {
            let uri = $origin.path().to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => match serde_json::to_string(&$data) {
                    Ok(response_str) => {
                        let _ = Redis::set_data::<String, String>(r_conn, uri, response_str);
                    }
                    Err(error) => {
                        error!(target:"macros/request_caching", "Error serializing response: {}", error);
                    }
                },
                Err(error) => {
                    error!(target:"macros/request_caching", "Error connecting to redis: {}", error);
                    return Err(Status::InternalServerError);
                }
            }
        }

        return Ok(Json($data));
    };
}

pub(crate) use cache_response;
pub(crate) use read_cache_request;
