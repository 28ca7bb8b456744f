pub mod amortization;
pub mod interactive;
pub mod rate_lookup;
