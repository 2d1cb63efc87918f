pub mod controller;
pub mod result;
pub mod round;
pub mod word;
