pub mod detention;
