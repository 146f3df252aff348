pub mod default_catchall;

pub use default_catchall::DefaultCatchallParser;
