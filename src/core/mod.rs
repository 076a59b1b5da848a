//! Core orchestration policy: run-file name grammar, resource and walltime
//! policies, range resolution and the sequential submitter. Nothing here touches
//! the filesystem except `ResourceProfile::with_overrides_from`, which reads a
//! JSON override file. Adapters live in `io` and the high-level entrypoint in `api`.
pub mod params;
pub mod profile;
pub mod range;
pub mod stage;
pub mod submit;
pub mod walltime;
