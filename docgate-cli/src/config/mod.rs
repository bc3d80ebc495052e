mod loader;

pub use loader::PolicyLoader;
