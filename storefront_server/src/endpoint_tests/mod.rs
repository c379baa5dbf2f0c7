mod catalog;
mod helpers;
mod mocks;
mod orders;
mod payments;
