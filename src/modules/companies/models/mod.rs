mod company;

pub use company::{Company, CreateCompanyRequest};
