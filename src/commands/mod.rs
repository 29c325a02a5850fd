pub mod inspect;
mod output;
pub mod run;
pub mod status;
pub mod verify;
