mod determinism;
mod environment;
mod flight;
mod ground;
mod propulsion;
mod trim;
