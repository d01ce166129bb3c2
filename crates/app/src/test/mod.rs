//! Shared test infrastructure.

mod context;

pub(crate) use context::TestContext;
pub(crate) use memory::InMemoryCartsRepository;
