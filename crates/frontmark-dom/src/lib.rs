//! Post-render upgrade of frontmatter placeholders.
//!
//! Once the HTML produced by the markdown pipeline is loaded into a tree,
//! [`upgrade_frontmatter_blocks`] replaces every placeholder with the
//! structured rendering of its parsed content.

pub mod render;
pub mod tree;
pub mod upgrade;

pub use render::{JsonRenderer, RenderError, TableRenderer};
pub use tree::{DisplayTree, HtmlTree, TreeError};
pub use upgrade::{
    render_frontmatter, upgrade_frontmatter_blocks, UpgradeError, UpgradeReport,
    FRONTMATTER_CONTAINER_CLASS,
};
