// Remote data services

pub mod partners;

pub use partners::PartnersService;
