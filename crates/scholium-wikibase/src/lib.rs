//! Wikibase boundary for Scholium.
//!
//! Everything that talks to the knowledge base lives here: a SPARQL client
//! for the query service ([`sparql`]), a claim-writing client for the
//! MediaWiki action API ([`claims`]), and the opaque entity id type shared
//! by both ([`ids`]). The rest of the workspace reaches the backend only
//! through the [`QueryService`] and [`ClaimWriter`] traits, so tests can
//! swap in canned responses without a network.

pub mod claims;
pub mod error;
pub mod ids;
pub mod sparql;

pub use claims::{ClaimWriter, ItemClaimValue, WikibaseClient};
pub use error::{Result, WikibaseError};
pub use ids::ItemId;
pub use sparql::{QueryService, SparqlClient, SparqlResponse, SparqlRow, SparqlValue};
