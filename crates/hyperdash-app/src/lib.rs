// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

pub mod ids;
pub mod model;
pub mod query;
pub mod shortcuts;
pub mod state;

pub use ids::*;
pub use model::*;
pub use query::*;
pub use shortcuts::*;
pub use state::*;
