pub mod auth_service;
pub mod category_service;
pub mod destination_service;
pub mod product_service;
pub mod region_service;
pub mod security;
pub mod toko_service;
pub mod transaction_service;
pub mod user_service;
