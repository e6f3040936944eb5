pub mod countdown;
pub mod geocode;
pub mod position;
