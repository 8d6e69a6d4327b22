pub mod cancel;
pub mod controller;
pub mod cursor;
pub mod session;
