pub mod estimate_request_repo;

pub use estimate_request_repo::EstimateRequestRepo;
