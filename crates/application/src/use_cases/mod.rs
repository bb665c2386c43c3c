pub mod cleanup_dead_proxies;
pub mod generate_smart_config;
pub mod get_top_subnets;
pub mod import_candidates;
pub mod reverify_record;
pub mod validate_candidate;

pub use cleanup_dead_proxies::CleanupDeadProxiesUseCase;
pub use generate_smart_config::GenerateSmartConfigUseCase;
pub use get_top_subnets::GetTopSubnetsUseCase;
pub use import_candidates::ImportCandidatesUseCase;
pub use reverify_record::ReverifyRecordUseCase;
pub use validate_candidate::ValidateCandidateUseCase;
