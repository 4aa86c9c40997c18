pub mod car_make;
pub mod car_model;
pub mod dealer_review;
pub mod session;
pub mod user;
