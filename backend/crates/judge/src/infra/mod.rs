//! Infrastructure Layer
//!
//! Database, broker, and in-memory store implementations.

pub mod amqp;
pub mod postgres;
pub mod scratch_store;

pub use amqp::AmqpPublisher;
pub use postgres::PgJudgeRepository;
pub use scratch_store::ScratchStore;
