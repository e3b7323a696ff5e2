mod search_dto;

pub use search_dto::{
    FormErrors, IncidentResultDto, ReportResultDto, SearchCriteria, SearchForm, StatusFilter,
};
