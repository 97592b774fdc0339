pub mod ai;
pub mod applications;
pub mod normalize;
pub mod vacancy_search;

pub use ai::{AiOutcome, CareerAdvisor, ResumeInput};
pub use applications::{
    AccountGateway, ApplicationError, ApplicationService, ApplyOutcome, ApplyRequest,
};
pub use vacancy_search::{SearchError, VacancySearchService, VacancySource};
