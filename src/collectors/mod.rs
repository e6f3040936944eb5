pub mod fetch;
pub mod poller;
pub mod position_client;
