pub mod billing;
pub mod period;
pub mod tenant;
