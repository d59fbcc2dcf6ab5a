//! Image definition for runway.
//!
//! # Deploy pipeline
//!
//! ```text
//! runway deploy [PROJECT] [REGION]
//!   1. Target       ── args → runway.toml → gcloud config get-value project
//!   2. Context      ── context::validate() (manifest + Dockerfile present)
//!   3. Preflight    ── gcloud auth / project / APIs
//!   4. Deploy       ── gcloud run deploy --source <dir> (Cloud Build builds the image)
//!   5. Report       ── gcloud run services describe → URL + follow-up notes
//! ```
//!
//! # Image layout
//!
//! The generated Dockerfile is a single stage on a slim Python image:
//! native libraries for the PostgreSQL driver, `pip install` from the
//! manifest, the application tree, and gunicorn as the entry command.

pub mod context;
pub mod dockerfile;
pub mod eject;

pub use dockerfile::DockerfileGenerator;
