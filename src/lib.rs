//! Slidecast: a step-graph presentation player with narration capture
//!
//! Slidecast is built on Stillwater's "pure core, imperative shell" philosophy.
//! Navigation and sound are plain data transformed by pure functions; all I/O
//! lives in the [`effects`] shell, which runs the commands the core returns.
//!
//! # Core Concepts
//!
//! - **Step graph**: the presentation's steps, in preorder, each on one slide
//! - **Timeline**: where the viewer is, what came before and what can be redone
//! - **Sound machine**: playback, timed recording and live narration
//! - **Session**: the only owner of both, changed only through `dispatch`
//!
//! # Example
//!
//! ```rust
//! use slidecast::builder::SessionBuilder;
//! use slidecast::core::{SoundState, StepNode};
//! use slidecast::dispatch::{map_key, Focus, KeyAction};
//! use slidecast::manifest::Manifest;
//! use chrono::Utc;
//!
//! let manifest = Manifest {
//!     presentation: "Automata".into(),
//!     tree: StepNode::new()
//!         .slide("intro")
//!         .child(StepNode::new().name("definition")),
//!     slide_dict: [("intro".to_string(), "intro".to_string())].into(),
//!     live: Vec::new(),
//! };
//!
//! let mut session = SessionBuilder::new()
//!     .manifest(manifest)
//!     .server_connected(true)
//!     .build()
//!     .unwrap();
//!
//! let Some(KeyAction::Input(input)) = map_key("r", &Focus::Document) else {
//!     unreachable!()
//! };
//! let outcome = session.dispatch(input, Utc::now());
//! assert_eq!(outcome.sound, SoundState::Recording);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod effects;
pub mod manifest;
pub mod sync;
pub mod telemetry;

// Re-export commonly used types
pub use builder::SessionBuilder;
pub use config::PlayerConfig;
pub use core::{SoundState, StepGraph, StepId, Timeline};
pub use dispatch::{Input, Outcome, Session};
pub use manifest::Manifest;
pub use sync::DeepLink;
