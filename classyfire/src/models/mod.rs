//! Domain models: identifiers, classification results and batch policies

pub mod compound;
pub mod identifier;
pub mod policy;

pub use compound::{parse_response, ChemontNode, Classification, Compound, ExternalDescriptor};
pub use identifier::{is_valid_inchikey, normalize_inchikey, Identifier, IdentifierKind};
pub use policy::{EmptyClassificationPolicy, FailurePolicy};
