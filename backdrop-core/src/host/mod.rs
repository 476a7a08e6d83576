//! Host collaborators
//!
//! The engine never reaches into a document store, a settings backend or a window system
//! directly. It talks to these seams instead:
//!
//! - [`PathResolver`]: turns an authored image reference into an addressable resource.
//! - [`ViewHost`]: hands out the active view container and the workspace body.
//! - [`SettingsStore`](crate::settings::SettingsStore): loads and persists the global preference.
//! - [`Layout`](crate::viewport::Layout): reports where markers are laid out.
//!
//! The submodules provide in-process implementations used by the CLI and the tests:
//! a filesystem vault, an in-memory workspace, a Markdown rendering pipeline and a
//! line-based layout.

use markup5ever_rcdom::Handle;

pub mod layout;
pub mod markdown;
pub mod vault;
pub mod workspace;

pub use layout::LineLayout;
pub use markdown::{render_markdown, PendingBlock, RenderedDocument};
pub use vault::VaultResolver;
pub use workspace::Workspace;

/// Resolves image references against the document store
pub trait PathResolver {
    /// `None` when the reference cannot be found.
    fn resolve(&self, reference: &str, context_path: &str) -> Option<String>;
}

impl<F> PathResolver for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn resolve(&self, reference: &str, context_path: &str) -> Option<String> {
        self(reference, context_path)
    }
}

/// Access to the host's visual tree
pub trait ViewHost {
    /// Content container of the active document view.
    fn current_container(&self) -> Option<Handle>;

    /// Workspace-wide element carrying the global default style class.
    fn workspace(&self) -> Option<Handle>;
}
