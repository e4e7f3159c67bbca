pub mod helpers;
pub mod catalog;
pub mod pricing;
pub mod wizard;
pub mod quote;
