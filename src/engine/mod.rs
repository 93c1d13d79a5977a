pub mod bids;
pub mod countdown;
pub mod money;
pub mod page;
pub mod poller;
pub mod types;
pub mod validate;
pub mod view;
