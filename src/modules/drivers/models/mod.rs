mod driver;

pub use driver::{CreateDriverRequest, Driver};
