// Application layer: concrete pipelines wiring domain services to ports.

pub mod pipelines;
