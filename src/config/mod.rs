mod data;

pub use data::DataConfig;
