pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod goals;
pub mod graphql;
pub mod logging;
pub mod meals;
pub mod relations;
pub mod resource;
pub mod state;
pub mod trainers;
pub mod users;
pub mod weather;
pub mod workouts;

