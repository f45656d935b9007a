use rocket::{launch, routes, Build, Rocket};

use race_strategy_api::modules::helpers::fairings::cors::CORS;
use race_strategy_api::modules::helpers::logging::setup_logging;
use race_strategy_api::routes::api;

#[launch]
fn rocket() -> Rocket<Build> {
    setup_logging().expect("Failed to setup logging");

    // start the webserver
    rocket::build().attach(CORS).mount(
        "/api",
        routes![
            // races
            api::race::save_one,
            api::race::update_one,
            api::race::delete_one,
            api::race::get_one,
            api::race::get_all,
            api::race::get_by_vehicle,
            // vehicles
            api::vehicle::save_one,
            api::vehicle::update_one,
            api::vehicle::delete_one,
            api::vehicle::get_one,
            api::vehicle::get_all,
        ],
    )
}
