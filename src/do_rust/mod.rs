pub mod account;
pub mod action_types;
pub mod actions;
pub mod droplet_types;
pub mod droplets;
pub mod request_builder;
