pub mod azure_read;

pub use azure_read::AzureReadClient;
