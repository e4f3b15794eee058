pub mod controller;
pub mod router;
mod view;
