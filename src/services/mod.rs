/// Credential check, visitor mode and logout.
pub mod auth_service;
/// History export projection.
pub mod export_service;
/// Public service for read-only scoreboard information.
pub mod public_service;
/// Score mutations and board persistence.
pub mod score_service;
/// Pending change staging with confirm/cancel.
pub mod staging_service;
