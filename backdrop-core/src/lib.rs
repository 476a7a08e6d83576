//! Scroll-driven section backgrounds for rendered documents
//!
//!     Authors drop small `backdrop` blocks into a document. As the reader scrolls, the block
//!     that has most recently reached reading position decides the background image, its blur
//!     and opacity, and the presentation preset of the text container. This crate is the engine
//!     behind that: it parses blocks, tracks which one is active and converges the render tree
//!     onto the resulting style.
//!
//!     This is a pure lib: no printing, no environment access, no process exit. The host (an
//!     editor plugin, the backdrop-cli preview, a test) supplies the collaborators in ./host.
//!
//! Architecture
//!
//!     Data flows leaf first:
//!
//!     raw block text → block (BlockConfig) → stored on a marker → tracker (on scroll)
//!         → selected BlockConfig → resolver → render tree mutation
//!
//!     View switches bypass the tracker and go straight to resolver::reset through the
//!     lifecycle coordinator.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── catalog.rs            # Closed registry of style presets
//!     ├── block.rs              # Block parser and BlockConfig
//!     ├── dom.rs                # Retained render tree helpers (rcdom)
//!     ├── viewport.rs           # Observation root geometry and the Layout seam
//!     ├── tracker.rs            # Visibility tracker
//!     ├── resolver.rs           # Style resolution and application
//!     ├── settings.rs           # Global preference and SettingsStore
//!     ├── lifecycle.rs          # Coordinator wiring events to the above
//!     ├── css.rs                # Embedded stylesheet
//!     ├── host
//!     │   ├── mod.rs            # PathResolver and ViewHost traits
//!     │   ├── vault.rs          # Filesystem resolver
//!     │   ├── workspace.rs      # In-memory workspace
//!     │   ├── markdown.rs       # Markdown rendering pipeline (comrak)
//!     │   └── layout.rs         # Line based layout
//!     └── lib.rs
//!
//! Testing
//!
//!     tests
//!     ├── lib.rs
//!     ├── common/mod.rs
//!     └── scenario/<name>.rs
//!
//!     As with any multi-file test crate, subdirectories must be listed from tests/lib.rs.
//!
//! Core Algorithms
//!
//!     Parsing is total: defaults absorb every malformed input except a missing image, which is
//!     surfaced inline so authors can fix it. Selection takes the first intersecting marker of a
//!     batch in delivery order. Application is idempotent: a reset followed by an apply, or two
//!     applies in a row, always land on the same tree as a single apply on a fresh container.
//!
//! Library Choices
//!
//!     The render tree is markup5ever_rcdom and is serialized by html5ever, so any state can be
//!     inspected as plain HTML. Markdown is parsed with comrak. Marker payloads and persisted
//!     settings go through serde/serde_json. Logging goes through the log facade.

pub mod block;
pub mod catalog;
pub mod css;
pub mod dom;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod resolver;
pub mod settings;
pub mod tracker;
pub mod viewport;

pub use block::{parse_block, BlockConfig};
pub use catalog::StyleId;
pub use error::BackdropError;
pub use lifecycle::{BlockOutcome, Coordinator, CoordinatorOptions};
pub use settings::{GlobalPreference, MemorySettings, SettingsStore};
pub use tracker::{IntersectionEntry, VisibilityTracker};
pub use viewport::{Layout, ObservationRoot, Span, Viewport};

pub use markup5ever_rcdom::Handle;
