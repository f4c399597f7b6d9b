// Domain layer: models and ports shared by the request builder, client and presenter.

pub mod model;
pub mod ports;
