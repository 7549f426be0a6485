pub mod analysis;
pub mod epoch;
pub mod history;
pub mod message;
pub mod parameters;
pub mod settings;
