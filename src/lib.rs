pub mod cascade;
pub mod cli;
pub mod ctx;
pub mod io;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod pool;
pub mod schema;
pub mod search;
pub mod thresholds;
