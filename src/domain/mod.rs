// Domain layer: the user record and the ports the handler talks to.

pub mod model;
pub mod ports;
