// Core module - Modem protocol and the abstractions it runs on
pub mod communication;
pub mod modem;
