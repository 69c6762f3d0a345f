pub mod credential_repository;
