pub mod clock;
pub mod datastore;
pub mod provider;
