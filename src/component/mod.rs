//! Component definitions and usage-site type resolution
//!
//! Components are declared once and used from markup by tag name:
//!
//! ```text
//! component GenericContext<TItem> {
//!     param Items: List<TItem>
//! }
//!
//! let numbers: List<int>
//!
//! <GenericContext Items=numbers />      // TItem inferred as int
//! <GenericContext TItem=string />       // TItem given explicitly
//! <GenericContext />                    // reported: cannot be inferred
//! ```

mod inference;
mod registry;

pub use inference::{
    explicit_type, resolve_document, resolve_site, value_type, Outcome, SiteResolution,
};
pub use registry::{
    BindingScope, ComponentDefinition, ComponentRegistry, ParameterDefinition, RegistryError,
};
