pub mod auth;
pub mod category;
pub mod destination;
pub mod product;
pub mod region;
pub mod toko;
pub mod transaction;
pub mod user;
