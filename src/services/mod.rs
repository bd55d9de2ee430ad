pub mod debouncer;
pub mod decoder;
pub mod history;
pub mod permission;
pub mod pipeline;
pub mod redeem;
pub mod session;
