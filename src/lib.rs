#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod instance;
pub mod layout;
pub mod layout_dump;
pub mod path;
pub mod tree;
pub mod viewport;
pub mod visibility;

pub use config::{load_config, LayoutConfig, NodeFootprint};
pub use instance::Instance;
pub use layout::{compute_tree_layout, LayoutDiagnostic, Link, NodePosition, TreeLayout};
pub use path::{trace_instance_path, TracedPath};
pub use tree::{DecisionTree, NodeId, NodeRecord, TreeDataError};
pub use viewport::ViewportTransform;

#[cfg(feature = "cli")]
pub use cli::run;
