pub mod estimate_request;
