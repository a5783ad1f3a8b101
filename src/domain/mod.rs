// Domain layer: Shopify entities, report rows and the ports the core depends on.

pub mod model;
pub mod ports;
