//! Agents wandering an arena split by a river, spreading a disease by
//! proximity and through shared food.
//!
//! [`World`] owns the population and advances it one tick at a time; every
//! random draw comes from the world's seeded generator.

pub mod stat;
pub mod util;
pub mod world;

pub use world::{
    agent::{Agent, HealthState},
    commons::{ConfigError, FoodParams, HealthStatus, TransmissionDraw, WorldParams},
    food::{FoodField, FoodId},
    geometry::{Arena, Rect},
    AgentView, TickReport, World,
};
