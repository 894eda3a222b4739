//! Core of a long-form bytecode interpreter for an Ethereum-compatible VM.
//!
//! This crate covers three tightly coupled subsystems: the 9-bit opcode
//! space ([`opcode`]) and the fixed-width instructions built from it
//! ([`instruction`]); the pooled word stack and its static usage analysis
//! ([`stack`], [`stack_usage`], [`stack_bounds`]); and the pluggable dispatch
//! runners ([`runner`]) with their n-gram [`statistics`].
//!
//! Host-state access, gas schedules, raw-bytecode-to-long-form conversion,
//! Keccak-256, and any CLI/configuration surface are external collaborators
//! consumed through the narrow interfaces in [`context`] and [`runner`], not
//! implemented here.

pub mod context;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod runner;
pub mod stack;
pub mod stack_bounds;
pub mod stack_usage;
pub mod statistics;

pub use context::{Context, Parameters, Status};
pub use error::{ExecutionError, StaticAnalysisError};
pub use instruction::{Code, Instruction};
pub use opcode::OpCode;
pub use runner::{LoggingRunner, PlainRunner, Runner, StatisticsRunner, Step};
pub use stack::Stack;
pub use stack_bounds::StackBounds;
pub use stack_usage::StackUsage;
pub use statistics::{StatsCollector, Statistics};
