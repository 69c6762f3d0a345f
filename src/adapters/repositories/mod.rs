mod file_credential_repository;
mod in_memory_credential_repository;

pub use file_credential_repository::FileCredentialRepository;
pub use in_memory_credential_repository::InMemoryCredentialRepository;
