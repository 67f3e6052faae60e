// Domain layer: core value types shared by every pipeline stage.

pub mod model;
