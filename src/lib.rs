pub mod compute;
pub mod controller;
pub mod entities;
