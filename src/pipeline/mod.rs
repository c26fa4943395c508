/// Search, filter and sort over an in-memory job collection
///
/// Every stage is a pure function of its inputs. [`run`] composes them into
/// the displayed collection; [`facets`](facets::facets) lists the values the
/// filter controls can offer.
pub mod facets;
pub mod filter;
pub mod orchestrator;
pub mod salary;
pub mod scorer;
pub mod sort;

pub use facets::{facets, Facets};
pub use filter::{apply_filters, matches};
pub use orchestrator::{run, ViewState};
pub use salary::extract_salary_value;
pub use scorer::{rank, score, NormalizedQuery};
pub use sort::{collation_key, sort_jobs};
