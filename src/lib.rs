pub mod camera;
pub mod dataset;
pub mod geometry_utils;
pub mod gesture;
pub mod hand;
pub mod interpreter;
pub mod provider;
pub mod settings;
pub mod sink;
pub mod worker;

pub type Point2D = (f32, f32);
