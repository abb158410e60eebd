pub mod criteria;
pub mod equivalence;
pub mod facet_match;
pub mod facets;
pub mod pagination;
pub mod pipeline;
pub mod range;
pub mod record;
pub mod requirements;
pub mod visibility;

pub use criteria::{Bounds, FacetConstraint, SearchCriteria};
pub use equivalence::{EquivalenceLoadError, EquivalenceTable};
pub use facets::{FacetStage, RangeFacet, ValueFacet};
pub use pagination::{PAGE_SIZE, max_page, page_slice};
pub use pipeline::FilterPipeline;
pub use range::RangeValue;
pub use record::FacetedRecord;
pub use requirements::{KoDecision, RequirementReport, evaluate_requirements};
pub use visibility::{TenantGate, ViewerContext, VisibleSet, apply_visibility};
