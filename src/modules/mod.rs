pub mod fuel_calculator;
pub mod redis;

pub mod models {
    pub mod race;
    pub mod vehicle;

    pub mod general;
}

pub mod helpers {
    pub mod logging;
    pub mod math;
    pub mod vehicle;

    pub mod fairings {
        pub mod cors;
    }
}
